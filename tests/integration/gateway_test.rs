//! End-to-end gateway tests
//!
//! Drive the composed router against a mocked trust authority and a mocked
//! Sandbox API over real HTTP.

#![allow(dead_code)]

mod auth;
mod common;
mod resilience;
mod startup;
