use tracing::warn;

/// 内置的系统提示词模板（版本化的评估指令，属于产品配置）
const DEFAULT_SYSTEM_PROMPT: &str = include_str!("../prompts/system_prompt.txt");

// ========== 结果抽取边界标记 ==========
// 这两个标记与 prompts/system_prompt.txt 中的输出格式标题耦合：
// 修改提示词模板的标题时必须同步更新这里。
// 响应中缺少任一标记时，抽取结果为 "N/A"（设计如此，不是错误）。

/// 评分章节的起始标记
pub const RUBRIC_SECTION_START: &str = "Rubric Evaluation";
/// 评分章节的结束标记
pub const RUBRIC_SECTION_END: &str = "Suggestions for Improvement";

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 解析结果缓存目录
    pub cache_dir: String,
    /// 拼装后 prompt 的 token 上限（超出则跳过 LLM 调用）
    pub max_prompt_tokens: usize,
    /// LLM 响应的 token 上限
    pub max_response_tokens: u32,
    /// LLM 采样温度
    pub temperature: f32,
    /// 发送给 LLM 的系统提示词
    pub system_prompt: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 结果表格记录配置 ---
    /// 表格记录服务的 webhook 地址（未设置则不记录）
    pub sheet_webhook_url: Option<String>,
    /// base64 编码的凭证内容（启动时解码到 sheet_credentials_path）
    pub sheet_credentials_b64: Option<String>,
    /// 凭证文件落盘路径
    pub sheet_credentials_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: ".cache".to_string(),
            max_prompt_tokens: 5000,
            max_response_tokens: 5000,
            temperature: 0.45,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            sheet_webhook_url: None,
            sheet_credentials_b64: None,
            sheet_credentials_path: "sheet_credentials.json".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            cache_dir: std::env::var("CACHE_DIR").unwrap_or(default.cache_dir),
            max_prompt_tokens: std::env::var("MAX_PROMPT_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_prompt_tokens),
            max_response_tokens: std::env::var("MAX_RESPONSE_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_response_tokens),
            temperature: std::env::var("LLM_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.temperature),
            system_prompt: load_system_prompt(default.system_prompt),
            llm_api_key: std::env::var("LLM_API_KEY").or_else(|_| std::env::var("API_KEY")).unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            sheet_webhook_url: std::env::var("SHEET_WEBHOOK_URL").ok().filter(|v| !v.is_empty()),
            sheet_credentials_b64: std::env::var("SHEET_CREDENTIALS_B64").ok().filter(|v| !v.is_empty()),
            sheet_credentials_path: std::env::var("SHEET_CREDENTIALS_PATH").unwrap_or(default.sheet_credentials_path),
        }
    }
}

/// 加载系统提示词：优先使用 SYSTEM_PROMPT_FILE 指定的文件，否则使用内置模板
fn load_system_prompt(default: String) -> String {
    match std::env::var("SYSTEM_PROMPT_FILE") {
        Ok(path) if !path.is_empty() => match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("⚠️ 读取系统提示词文件失败 ({}): {}，改用内置模板", path, e);
                default
            }
        },
        _ => default,
    }
}
