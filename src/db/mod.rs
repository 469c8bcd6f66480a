pub mod settings_queries;
