pub mod config;
pub mod driver;
pub mod entities;
pub mod error;
pub mod formation;
pub mod input;
pub mod wave;
