pub mod client;

pub use client::{NinjasClient, NutritionSource};
