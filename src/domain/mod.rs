// Domain layer - Core types and decision rules

pub mod model;
pub mod rules;
