pub mod appreciation;
pub mod filtering;
pub mod ordering;
pub mod parsing;
pub mod render;
pub mod spotlight;
pub mod statistics;
pub mod theme;
pub mod wall_service;
