//! Rule evaluation
//!
//! Walks a parsed [`Expr`] against one field value. `AND` and `OR`
//! short-circuit, `NOT` inverts a failure into success, `EACH` applies its
//! inner rule to every element, and calls dispatch through the
//! [`Validations`] registry.
//!
//! Only failures ([`RuleError::is_failure`]) take part in combinator logic.
//! Fatal errors such as an unknown function or an unresolvable bound
//! parameter always propagate, even through `OR` and `NOT`.

use crate::error::{FieldError, RuleError, RuleResult};
use crate::record::FieldResolver;
use crate::registry::Validations;
use crate::value::Value;
use ruletag_lang::{BinaryOp, Expr};
use std::sync::Arc;
use tracing::trace;

/// Maximum recursion depth for rule evaluation
pub const MAX_RECURSION_DEPTH: usize = 256;

/// Evaluator for rule ASTs
#[derive(Debug, Clone)]
pub struct Evaluator {
    validations: Arc<Validations>,
}

impl Evaluator {
    /// Create a new evaluator over a frozen registry
    pub fn new(validations: Arc<Validations>) -> Self {
        Self { validations }
    }

    /// Registry used for call dispatch
    pub fn validations(&self) -> &Validations {
        &self.validations
    }

    /// Evaluate `expr` for the field `field` holding `value`.
    ///
    /// Bound parameters are resolved through `resolver`, which normally is
    /// the record that owns the field.
    pub fn evaluate(
        &self,
        field: &str,
        expr: &Expr,
        value: &Value,
        resolver: &dyn FieldResolver,
    ) -> RuleResult<()> {
        let result = self.eval_with_depth(field, expr, value, resolver, 0);
        trace!(field, rule = %expr, ok = result.is_ok(), "evaluated rule");
        result
    }

    fn eval_with_depth(
        &self,
        field: &str,
        expr: &Expr,
        value: &Value,
        resolver: &dyn FieldResolver,
        depth: usize,
    ) -> RuleResult<()> {
        if depth > MAX_RECURSION_DEPTH {
            return Err(RuleError::RecursionLimit {
                limit: MAX_RECURSION_DEPTH,
            });
        }

        match expr {
            Expr::Binary { op, .. } => self.eval_chain(field, *op, expr, value, resolver, depth),

            Expr::Paren(inner) => self.eval_with_depth(field, inner, value, resolver, depth + 1),

            Expr::Negative(inner) => {
                match self.eval_with_depth(field, inner, value, resolver, depth + 1) {
                    Ok(()) => Err(FieldError::new(field, expr.to_string()).into()),
                    Err(err) if err.is_failure() => Ok(()),
                    Err(err) => Err(err),
                }
            }

            Expr::Each(inner) => self.eval_each(field, inner, value, resolver, depth),

            Expr::Call { name, args } => self.eval_call(field, expr, name, args, value, resolver),

            Expr::BoundParam(_) | Expr::Literal(_) => {
                Err(RuleError::unknown_expression(expr.to_string()))
            }
        }
    }

    /// Evaluate a left-leaning run of the same combinator as one level.
    ///
    /// `a,b,c` parses as `(a,b),c`; walking the run in a loop keeps long flat
    /// rules clear of the depth limit, which only guards real nesting.
    fn eval_chain(
        &self,
        field: &str,
        op: BinaryOp,
        expr: &Expr,
        value: &Value,
        resolver: &dyn FieldResolver,
        depth: usize,
    ) -> RuleResult<()> {
        let mut operands = Vec::new();
        let mut node = expr;
        while let Expr::Binary { op: node_op, left, right } = node
            && *node_op == op
        {
            operands.push(right.as_ref());
            node = left.as_ref();
        }
        operands.push(node);

        let mut last = Ok(());
        for operand in operands.into_iter().rev() {
            let result = self.eval_with_depth(field, operand, value, resolver, depth + 1);
            let settled = match (op, &result) {
                (BinaryOp::And, Err(_)) | (BinaryOp::Or, Ok(())) => true,
                (BinaryOp::Or, Err(err)) => !err.is_failure(),
                (BinaryOp::And, Ok(())) => false,
            };
            if settled {
                return result;
            }
            last = result;
        }
        last
    }

    fn eval_each(
        &self,
        field: &str,
        inner: &Expr,
        value: &Value,
        resolver: &dyn FieldResolver,
        depth: usize,
    ) -> RuleResult<()> {
        match value {
            Value::List(items) => items
                .iter()
                .try_for_each(|item| self.eval_with_depth(field, inner, item, resolver, depth + 1)),
            Value::String(s) => s.chars().try_for_each(|c| {
                let item = Value::String(c.to_string());
                self.eval_with_depth(field, inner, &item, resolver, depth + 1)
            }),
            other => Err(RuleError::incompatible(format!(
                "each requires a list or a string, got {} {other}",
                other.type_name()
            ))),
        }
    }

    fn eval_call(
        &self,
        field: &str,
        expr: &Expr,
        name: &str,
        args: &[Expr],
        value: &Value,
        resolver: &dyn FieldResolver,
    ) -> RuleResult<()> {
        let validation = self
            .validations
            .get(name)
            .map_err(|_| RuleError::unknown_function(name))?;

        let params = args
            .iter()
            .map(|arg| match arg {
                Expr::BoundParam(path) => resolver.resolve(path),
                Expr::Literal(lit) => Ok(Value::from(lit)),
                other => Err(RuleError::invalid_argument(
                    name,
                    format!("arguments must be literals or bound parameters, got {}", other.kind_name()),
                )),
            })
            .collect::<RuleResult<Vec<_>>>()?;

        trace!(field, function = name, args = params.len(), "calling validation");

        validation
            .validate(value, &params)
            .map_err(|cause| FieldError::new(field, expr.to_string()).with_cause(cause).into())
    }
}
