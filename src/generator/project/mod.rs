mod generate;

pub use generate::{
    build_renderer, generate_from_schema_file, load_graph, plan, GraphSummary, PlannedFile,
    MODULE_INDEX_KIND,
};
