pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod input;
pub mod objects;
pub mod render;
pub mod scene;
pub mod utils;
