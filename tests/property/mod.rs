// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Addressing and numbering properties of generated topology plans.

mod plan_invariants;
