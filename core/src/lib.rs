//! Core library for the larder meal-planning toolkit: record models, the
//! catalog merge pipeline, schema checks, and the meal planner.

pub mod catalog;
pub mod models;
pub mod planner;
pub mod schema;
