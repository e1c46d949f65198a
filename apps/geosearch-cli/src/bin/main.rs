use std::env;

use geosearch_client::{EmbeddingEndpoint, OpenSearchBackend};
use geosearch_core::config::{resolve_with_base, Config, SearchSettings};
use geosearch_core::mapping::FieldMappingRegistry;
use geosearch_core::traits::EmbeddingProvider;
use geosearch_engine::SearchPipeline;
use geosearch_query::{QueryTuning, SearchParams};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <query> [key=value ...]", args[0]);
        eprintln!(
            "Example: {} 'flood mapping' method=semantic lang=en org=nrcan bbox='41|-141|84|-52'",
            args[0]
        );
        std::process::exit(1);
    }

    let mut pairs: Vec<(String, String)> = vec![("q".to_string(), args[1].clone())];
    for arg in &args[2..] {
        if let Some((key, value)) = arg.split_once('=') {
            pairs.push((key.to_string(), value.to_string()));
        }
    }
    let params = SearchParams::from_pairs(pairs);

    let config = Config::load()?;
    let settings = SearchSettings::from_config(&config)?;
    let tuning: QueryTuning = config.get("tuning").unwrap_or_default();

    let base = env::current_dir()?;
    let mapping_path = resolve_with_base(&base, &settings.field_mappings);
    let registry = FieldMappingRegistry::from_path(&mapping_path)?;

    let backend = OpenSearchBackend::from_settings(&settings)?;
    let embedder = EmbeddingEndpoint::from_settings(&settings)?
        .map(|e| Box::new(e) as Box<dyn EmbeddingProvider>);

    let pipeline = SearchPipeline::new(backend, embedder, registry, tuning);
    let envelope = pipeline.search(&params)?;

    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}
