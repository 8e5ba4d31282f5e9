//! 决策 / 计划校验器
//!
//! 两层校验，均为全有或全无：
//! 1. 用 schemars 从类型生成 JSON Schema，jsonschema 编译一次后校验原始 JSON，收集全部结构差异
//! 2. 反序列化为强类型后再检查不变量（非空 reply / subreddit / keywords，count >= 1）

use std::sync::LazyLock;

use jsonschema::{validator_for, Validator};
use schemars::schema_for;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::actions::types::{Decision, Plan};

/// 结构校验失败：issues 为逐条差异描述
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("schema validation failed: {}", .issues.join("; "))]
pub struct SchemaViolation {
    pub issues: Vec<String>,
}

impl SchemaViolation {
    fn new(issues: Vec<String>) -> Self {
        Self { issues }
    }
}

struct CompiledSchema {
    pretty: String,
    validator: Result<Validator, String>,
}

impl CompiledSchema {
    fn build(schema: Value) -> Self {
        let pretty = serde_json::to_string_pretty(&schema).unwrap_or_default();
        let validator = validator_for(&schema).map_err(|e| format!("invalid schema: {e}"));
        Self { pretty, validator }
    }

    /// 返回全部 schema 差异；schema 本身不可用时也算作一条差异
    fn issues(&self, value: &Value) -> Vec<String> {
        match &self.validator {
            Ok(v) => v.iter_errors(value).map(|e| e.to_string()).collect(),
            Err(e) => vec![e.clone()],
        }
    }
}

static DECISION_SCHEMA: LazyLock<CompiledSchema> = LazyLock::new(|| {
    CompiledSchema::build(serde_json::to_value(schema_for!(Decision)).unwrap_or_default())
});

static PLAN_SCHEMA: LazyLock<CompiledSchema> = LazyLock::new(|| {
    CompiledSchema::build(serde_json::to_value(schema_for!(Plan)).unwrap_or_default())
});

/// Decision 的 JSON Schema（可拼入 system prompt）
pub fn decision_schema_json() -> &'static str {
    &DECISION_SCHEMA.pretty
}

/// Plan 的 JSON Schema
pub fn plan_schema_json() -> &'static str {
    &PLAN_SCHEMA.pretty
}

/// 无小数部分的浮点数（`2.0`）转为整数：schema 的 integer 接受它，serde 的整数类型不接受
fn normalize_integral(value: &mut Value) {
    let replacement = match &*value {
        Value::Number(n) if n.is_f64() => n.as_f64().and_then(|f| {
            if f.fract() != 0.0 {
                None
            } else if f >= 0.0 && f < u64::MAX as f64 {
                Some(Value::from(f as u64))
            } else if f < 0.0 && f >= i64::MIN as f64 {
                Some(Value::from(f as i64))
            } else {
                None
            }
        }),
        _ => None,
    };
    if let Some(r) = replacement {
        *value = r;
        return;
    }
    match value {
        Value::Array(items) => items.iter_mut().for_each(normalize_integral),
        Value::Object(map) => map.values_mut().for_each(normalize_integral),
        _ => {}
    }
}

fn typed<T: DeserializeOwned>(schema: &CompiledSchema, value: &Value) -> Result<T, SchemaViolation> {
    let issues = schema.issues(value);
    if !issues.is_empty() {
        return Err(SchemaViolation::new(issues));
    }
    let mut value = value.clone();
    normalize_integral(&mut value);
    serde_json::from_value(value).map_err(|e| SchemaViolation::new(vec![e.to_string()]))
}

/// 校验主控输出：reply 非空，且每个 action 都合法；任一 action 不合法则整个决策无效
pub fn parse_decision(value: &Value) -> Result<Decision, SchemaViolation> {
    let decision: Decision = typed(&DECISION_SCHEMA, value)?;
    let issues = decision.invariant_issues();
    if !issues.is_empty() {
        return Err(SchemaViolation::new(issues));
    }
    Ok(decision)
}

/// 校验子智能体输出；summary 与 steps 允许为空
pub fn parse_plan(value: &Value) -> Result<Plan, SchemaViolation> {
    typed(&PLAN_SCHEMA, value)
}
