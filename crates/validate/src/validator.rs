//! Validator engine with parsed-rule caching
//!
//! [`Validator`] parses rule text (caching the trees in a `moka` cache keyed
//! by rule text), evaluates it against values and walks records field by
//! field, aggregating failures into a single [`RuleError::Fields`].

use crate::config::ValidatorConfig;
use crate::error::{FieldError, FieldErrors, RuleError, RuleResult};
use crate::eval::Evaluator;
use crate::record::{FieldResolver, NoRecord, Record};
use crate::registry::{Validation, Validations};
use crate::value::Value;
use ruletag_lang::Expr;
use std::sync::{Arc, LazyLock};
use tracing::{debug, trace};

/// Field name reported by [`Validator::validate_value`]
pub const VALUE_FIELD: &str = "value";

/// Parses, caches and evaluates validation rules
pub struct Validator {
    config: ValidatorConfig,
    evaluator: Evaluator,
    /// Parsed rules keyed by rule text
    cache: Option<moka::sync::Cache<String, Arc<Expr>>>,
}

impl Validator {
    /// Start building a validator
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    /// Create a validator with the built-in validations and default config
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a validator with the built-in validations and `config`
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Active configuration
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Registry used by this validator
    pub fn validations(&self) -> &Validations {
        self.evaluator.validations()
    }

    /// Parse rule text, reusing a cached tree when one exists.
    ///
    /// Parse errors are returned as [`RuleError::Parse`] and never cached.
    pub fn parse(&self, rule: &str) -> RuleResult<Arc<Expr>> {
        let Some(cache) = &self.cache else {
            return Ok(Arc::new(ruletag_lang::parse(rule)?));
        };

        if let Some(expr) = cache.get(rule) {
            debug!(rule, "rule cache hit");
            return Ok(expr);
        }

        debug!(rule, "rule cache miss");
        let expr = Arc::new(ruletag_lang::parse(rule)?);
        cache.insert(rule.to_string(), Arc::clone(&expr));
        Ok(expr)
    }

    /// Evaluate a parsed rule for one field
    pub fn evaluate(
        &self,
        field: &str,
        expr: &Expr,
        value: &Value,
        resolver: &dyn FieldResolver,
    ) -> RuleResult<()> {
        self.evaluator.evaluate(field, expr, value, resolver)
    }

    /// Parse and evaluate `rule` for one field.
    ///
    /// Failures come back as the list of field errors (empty when the value
    /// passes); parse errors and other fatal errors are returned as `Err`.
    pub fn evaluate_field(
        &self,
        field: &str,
        rule: &str,
        value: &Value,
        resolver: &dyn FieldResolver,
    ) -> RuleResult<Vec<FieldError>> {
        let rule = rule.trim();
        if rule.is_empty() {
            if self.config.rule_required {
                return Err(RuleError::MissingRule);
            }
            return Ok(Vec::new());
        }
        if self.config.is_skip(rule) {
            return Ok(Vec::new());
        }

        let expr = self.parse(rule)?;
        match self.evaluate(field, &expr, value, resolver) {
            Ok(()) => Ok(Vec::new()),
            Err(err) if err.is_failure() => Ok(err.into_field_errors()),
            Err(err) => Err(err),
        }
    }

    /// Validate a lone value against `rule`.
    ///
    /// Bound parameters cannot be resolved here since there is no record.
    pub fn validate_value(&self, value: &Value, rule: &str) -> RuleResult<()> {
        self.evaluate_field(VALUE_FIELD, rule, value, &NoRecord)?
            .into_iter()
            .collect::<FieldErrors>()
            .into_result()
    }

    /// Validate every field of `record` against its rule.
    ///
    /// Nested records are validated first (unless their rule is the skip
    /// marker) and their failures are reported under their own field names.
    /// All failures are gathered into one [`RuleError::Fields`]; the first
    /// fatal error aborts the walk.
    pub fn validate_record(&self, record: &Record) -> RuleResult<()> {
        let mut errors = FieldErrors::new();
        self.walk_record(record, &mut errors)?;

        if !errors.is_empty() {
            debug!(failures = errors.len(), "record validation failed");
        }
        errors.into_result()
    }

    fn walk_record(&self, record: &Record, errors: &mut FieldErrors) -> RuleResult<()> {
        for (name, field) in record.fields() {
            let rule = field.rule.as_deref().map_or("", str::trim);

            if rule.is_empty() && self.config.rule_required {
                return Err(RuleError::MissingRule);
            }

            if let Value::Record(inner) = &field.value
                && !self.config.is_skip(rule)
            {
                trace!(field = name, "validating nested record");
                self.walk_record(inner, errors)?;
            }

            errors.extend(self.evaluate_field(name, rule, &field.value, record)?);
        }
        Ok(())
    }

    /// Drop every cached rule
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
            cache.run_pending_tasks();
            debug!("rule cache cleared");
        }
    }

    /// Number of cached rules (0 when caching is disabled)
    pub fn cache_entries(&self) -> u64 {
        self.cache.as_ref().map_or(0, |cache| {
            cache.run_pending_tasks();
            cache.entry_count()
        })
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("config", &self.config)
            .field("validations", self.validations())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`Validator`].
///
/// Custom validations can only be added here, before the registry is
/// shared with the evaluator.
#[derive(Debug)]
pub struct ValidatorBuilder {
    config: ValidatorConfig,
    validations: Option<Validations>,
    extra: Validations,
}

impl Default for ValidatorBuilder {
    fn default() -> Self {
        Self {
            config: ValidatorConfig::default(),
            validations: None,
            extra: Validations::new(),
        }
    }
}

impl ValidatorBuilder {
    /// Replace the whole configuration
    #[must_use = "builder methods must be chained or built"]
    pub fn config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Reject fields without a rule
    #[must_use = "builder methods must be chained or built"]
    pub fn rule_required(mut self, required: bool) -> Self {
        self.config.rule_required = required;
        self
    }

    /// Maximum number of cached rules; 0 disables the cache
    #[must_use = "builder methods must be chained or built"]
    pub fn cache_capacity(mut self, capacity: u64) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    /// Register a custom validation, replacing any built-in of the same name
    #[must_use = "builder methods must be chained or built"]
    pub fn validation(mut self, name: &str, validation: impl Validation + 'static) -> Self {
        self.extra.register(name, validation);
        self
    }

    /// Use `validations` instead of the built-in registry
    #[must_use = "builder methods must be chained or built"]
    pub fn validations(mut self, validations: Validations) -> Self {
        self.validations = Some(validations);
        self
    }

    /// Freeze the registry and build the validator
    pub fn build(self) -> Validator {
        let mut validations = self.validations.unwrap_or_default();
        validations.extend(&self.extra);

        let cache = (self.config.cache_capacity > 0).then(|| {
            moka::sync::Cache::builder()
                .max_capacity(self.config.cache_capacity)
                .build()
        });

        debug!(
            validations = validations.len(),
            cache_capacity = self.config.cache_capacity,
            rule_required = self.config.rule_required,
            "built validator"
        );

        Validator {
            config: self.config,
            evaluator: Evaluator::new(Arc::new(validations)),
            cache,
        }
    }
}

// ============================================================================
// DEFAULT VALIDATOR
// ============================================================================

static DEFAULT_VALIDATOR: LazyLock<Validator> = LazyLock::new(Validator::new);

/// Validate a lone value against `rule` with the default validator
pub fn validate_value(value: &Value, rule: &str) -> RuleResult<()> {
    DEFAULT_VALIDATOR.validate_value(value, rule)
}

/// Validate a record with the default validator
pub fn validate_record(record: &Record) -> RuleResult<()> {
    DEFAULT_VALIDATOR.validate_record(record)
}
