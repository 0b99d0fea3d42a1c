pub mod probe_pipeline;
