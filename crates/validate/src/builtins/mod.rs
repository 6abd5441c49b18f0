//! Built-in validations
//!
//! This module provides all built-in validations organized by category.

pub mod compare;
pub mod length;
pub mod membership;
pub mod nullable;
pub mod pattern;
pub mod time;

use crate::error::{RuleError, RuleResult};
use crate::registry::{IntArgsFn, SimpleFn, StringFn, Validations};

/// Register every built-in validation
pub(crate) fn register_all(registry: &mut Validations) {
    register_nullable_validations(registry);
    register_length_validations(registry);
    register_membership_validations(registry);
    register_pattern_validations(registry);
    register_compare_validations(registry);
    register_time_validations(registry);
}

// Registration methods for each category

fn register_nullable_validations(registry: &mut Validations) {
    registry.register("nil", SimpleFn(nullable::nil));
    registry.register("required", SimpleFn(nullable::required));
}

fn register_length_validations(registry: &mut Validations) {
    registry.register("len", IntArgsFn("len", length::len));
}

fn register_membership_validations(registry: &mut Validations) {
    registry.register("whitelist", membership::whitelist);
    registry.register("blacklist", membership::blacklist);
}

fn register_pattern_validations(registry: &mut Validations) {
    registry.register("match", pattern::matches);
}

fn register_compare_validations(registry: &mut Validations) {
    registry.register("lt", compare::lt);
    registry.register("lte", compare::lte);
    registry.register("gt", compare::gt);
    registry.register("gte", compare::gte);
}

fn register_time_validations(registry: &mut Validations) {
    registry.register("rfc3339", StringFn(time::rfc3339));
}

/// Helper to check argument count
pub(crate) fn check_arg_count<T>(func_name: &str, args: &[T], expected: usize) -> RuleResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(RuleError::invalid_argument(
            func_name,
            format!("expected {expected} argument(s), got {}", args.len()),
        ))
    }
}

/// Helper to check minimum argument count
pub(crate) fn check_min_arg_count<T>(func_name: &str, args: &[T], min: usize) -> RuleResult<()> {
    if args.len() >= min {
        Ok(())
    } else {
        Err(RuleError::invalid_argument(
            func_name,
            format!("expected at least {min} argument(s), got {}", args.len()),
        ))
    }
}
