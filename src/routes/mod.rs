pub mod advice;
pub mod currencies;
pub mod earnings;
pub mod health;
pub mod planner;
pub mod pricing;
pub mod statement;
