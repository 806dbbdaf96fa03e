// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// rust-i18n，翻译文件位于 locales/（zh-CN 默认，en 备选）
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use std::fmt;
use std::str::FromStr;

/// 支持的界面语言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    ZhCn,
    En,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "zh-CN" | "zh" => Ok(Locale::ZhCn),
            "en" | "en-US" => Ok(Locale::En),
            other => Err(format!("不支持的语言: {}（可选 zh-CN / en）", other)),
        }
    }
}

/// 当前语言（rust-i18n 全局状态）
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 切换语言
pub fn set_locale(locale: Locale) {
    rust_i18n::set_locale(locale.code());
}

/// 翻译消息
///
/// ```no_run
/// use academic_records::i18n::t;
/// let msg = t("report.no_data");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息并替换 %{name} 占位符
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(t(key), |message, (name, value)| {
        message.replace(&format!("%{{{}}}", name), value)
    })
}
