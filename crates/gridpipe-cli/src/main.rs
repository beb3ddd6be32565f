use gridpipe_compiler::compile;
use gridpipe_query::QueryParams;
use gridpipe_service::GridConfig;
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct Output {
    collection: String,
    pipeline: Vec<bson::Document>,
    total: Vec<bson::Document>,
}

/// Print both compiled pipelines for a grid query string.
///
/// Usage: `gridpipe '<query string>'`, with `GRIDPIPE_CONFIG` pointing at an
/// optional JSON grid config (collection, replacements, lookups,
/// preprocessing).
fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let query = std::env::args().nth(1).unwrap_or_default();
    let query = query.trim_start_matches('?');

    let config = match std::env::var("GRIDPIPE_CONFIG") {
        Ok(path) => GridConfig::load(&path).unwrap_or_else(|e| {
            eprintln!("failed to load {path}: {e}");
            std::process::exit(1);
        }),
        Err(_) => GridConfig::default(),
    };

    let params = QueryParams::parse(query).unwrap_or_else(|e| {
        eprintln!("invalid query string: {e}");
        std::process::exit(2);
    });
    let spec = config.spec(&params).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(2);
    });

    let compiled = compile(&spec);
    info!(
        collection = %config.collection,
        stages = compiled.pipeline.len(),
        total_stages = compiled.total.len(),
        "compiled grid query"
    );

    let output = Output {
        collection: config.collection,
        pipeline: compiled.pipeline,
        total: compiled.total,
    };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("failed to render pipelines: {e}");
            std::process::exit(1);
        }
    }
}
