//! HTTP handlers

pub mod health;
pub mod auth;
pub mod employees;
pub mod departments;
pub mod integration;
pub mod surveys;
pub mod onboarding;
pub mod predictions;
pub mod model;
