pub mod advice_service;
pub mod currency_service;
pub mod earnings_service;
pub mod llm_service;
pub mod planner_service;
pub mod pricing_service;
pub mod statement_service;
