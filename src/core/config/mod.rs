pub mod cost_model_config;
