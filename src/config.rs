//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `LEADBEE__*` 覆盖（双下划线表示嵌套，如 `LEADBEE__LLM__PROVIDER=openai`）。
//! 旧版环境变量 `MAIN_AGENT_PORT`、`PLAYWRIGHT_AVAILABLE` 仍然生效，优先级最高。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub automation: AutomationSection,
}

/// [app] 段
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppSection {
    pub name: Option<String>,
}

/// [server] 段：监听地址与 SSE 心跳间隔
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// SSE keep-alive 注释行间隔（秒）
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            keep_alive_secs: default_keep_alive_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5050
}

fn default_keep_alive_secs() -> u64 {
    15
}

/// [llm] 段：后端选择与超时
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSection {
    /// 后端：gemini / deepseek / openai / mock；实际选择还取决于对应 API Key 是否存在
    #[serde(default = "default_provider")]
    pub provider: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
    #[serde(default)]
    pub gemini: LlmModelSection,
    #[serde(default)]
    pub deepseek: LlmModelSection,
    #[serde(default)]
    pub openai: LlmModelSection,
    #[serde(default)]
    pub timeouts: LlmTimeoutsSection,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            base_url: None,
            gemini: LlmModelSection::default(),
            deepseek: LlmModelSection::default(),
            openai: LlmModelSection::default(),
            timeouts: LlmTimeoutsSection::default(),
        }
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LlmModelSection {
    pub model: Option<String>,
}

/// [llm.timeouts] 段：未设置时不对生成调用加超时
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LlmTimeoutsSection {
    pub request: Option<u64>,
}

/// [automation] 段：浏览器自动化（Playwright MCP）是否可用
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AutomationSection {
    #[serde(default)]
    pub playwright_available: bool,
}

/// 从 config 目录加载配置，环境变量 LEADBEE__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 叠加环境变量 LEADBEE__*（双下划线表示嵌套键）
/// 4. 最后应用旧版环境变量 MAIN_AGENT_PORT / PLAYWRIGHT_AVAILABLE
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("LEADBEE")
            .separator("__")
            .try_parsing(true),
    );

    let mut cfg: AppConfig = builder.build()?.try_deserialize()?;
    apply_legacy_env(&mut cfg, |key| std::env::var(key).ok());
    Ok(cfg)
}

/// 旧版 `.env` 约定：MAIN_AGENT_PORT=5050、PLAYWRIGHT_AVAILABLE=true
fn apply_legacy_env(cfg: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(port) = lookup("MAIN_AGENT_PORT").and_then(|s| s.trim().parse::<u16>().ok()) {
        cfg.server.port = port;
    }
    if let Some(flag) = lookup("PLAYWRIGHT_AVAILABLE") {
        cfg.automation.playwright_available = flag.trim() == "true";
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 5050);
        assert_eq!(cfg.server.keep_alive_secs, 15);
        assert_eq!(cfg.llm.provider, "gemini");
        assert!(cfg.llm.timeouts.request.is_none());
        assert!(!cfg.automation.playwright_available);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leadbee.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 6060

[llm]
provider = "deepseek"

[llm.timeouts]
request = 45

[automation]
playwright_available = true
"#,
        )
        .unwrap();

        let built = config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .unwrap();
        let cfg: AppConfig = built.try_deserialize().unwrap();
        assert_eq!(cfg.server.port, 6060);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.llm.provider, "deepseek");
        assert_eq!(cfg.llm.timeouts.request, Some(45));
        assert!(cfg.automation.playwright_available);
    }

    #[test]
    fn test_legacy_env_overrides() {
        let mut cfg = AppConfig::default();
        apply_legacy_env(&mut cfg, |key| match key {
            "MAIN_AGENT_PORT" => Some("7070".to_string()),
            "PLAYWRIGHT_AVAILABLE" => Some("true".to_string()),
            _ => None,
        });
        assert_eq!(cfg.server.port, 7070);
        assert!(cfg.automation.playwright_available);

        // 只有字面量 "true" 才视为可用
        apply_legacy_env(&mut cfg, |key| match key {
            "PLAYWRIGHT_AVAILABLE" => Some("1".to_string()),
            _ => None,
        });
        assert!(!cfg.automation.playwright_available);
        assert_eq!(cfg.server.port, 7070);
    }
}
