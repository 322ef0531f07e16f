//! LLM 评估服务 - 业务能力层
//!
//! 只负责"提交评估载荷并拿回原始响应"能力，不关心流程。
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};

/// 评估调用接口
///
/// 外部协作者：调用可能慢、可能失败，失败原样上抛，不做重试。
/// 抽成 trait 以便在测试中用替身验证预算闸门确实短路了调用。
#[async_trait]
pub trait EvalInvoker: Send + Sync {
    /// 提交系统指令与评估载荷，返回原始响应文本
    async fn invoke(&self, system_instruction: &str, payload: &str) -> AppResult<String>;
}

/// LLM 评估服务
pub struct EvalService {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_response_tokens: u32,
}

impl EvalService {
    /// 创建新的评估服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
            temperature: config.temperature,
            max_response_tokens: config.max_response_tokens,
        }
    }
}

#[async_trait]
impl EvalInvoker for EvalService {
    async fn invoke(&self, system_instruction: &str, payload: &str) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("评估载荷长度: {} 字符", payload.len());

        // 构建消息列表：系统指令 + 拼装好的评估载荷
        let mut messages = Vec::new();

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_instruction)
            .build()
            .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;
        messages.push(ChatCompletionRequestMessage::System(system_msg));

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(payload)
            .build()
            .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        // 构建请求
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_response_tokens)
            .build()
            .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;

        // 调用 API
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        // 提取响应内容
        let choice = response.choices.first().ok_or_else(|| {
            AppError::Llm(LlmError::EmptyResponse {
                model: self.model_name.clone(),
            })
        })?;

        let content = choice.message.content.clone().ok_or_else(|| {
            AppError::Llm(LlmError::EmptyContent {
                model: self.model_name.clone(),
            })
        })?;

        Ok(content.trim().to_string())
    }
}
