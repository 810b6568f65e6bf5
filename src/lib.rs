//! Coachbill - Billing Engine for a Fitness Coaching Platform
//!
//! This crate implements payment plans, client subscriptions, generated
//! payment schedules, date-derived payment lifecycle transitions, and
//! dashboard billing statistics.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
