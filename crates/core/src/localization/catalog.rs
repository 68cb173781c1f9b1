//! Translation tables

use std::collections::HashMap;

/// A source of message templates
///
/// Templates use positional placeholders `{0}`, `{1}`, ...
pub trait Catalog: Send + Sync {
    /// Template for a key, if known
    fn template(&self, key: &str) -> Option<&str>;
}

/// Fill `{0}`, `{1}`, ... with the given arguments
///
/// Placeholders without a matching argument are left as written.
pub fn format_template(template: &str, args: &[&dyn std::fmt::Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let arg = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            Some((close, args.get(index)?))
        });

        match arg {
            Some((close, value)) => {
                out.push_str(&value.to_string());
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// A catalog backed by a fixed key-to-template table
pub struct StaticCatalog {
    templates: HashMap<&'static str, &'static str>,
}

impl StaticCatalog {
    pub fn new(entries: &[(&'static str, &'static str)]) -> Self {
        Self {
            templates: entries.iter().copied().collect(),
        }
    }

    /// Built-in English messages
    pub fn english() -> Self {
        Self::new(ENGLISH)
    }

    /// Built-in Chinese messages
    pub fn chinese() -> Self {
        Self::new(CHINESE)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Catalog for StaticCatalog {
    fn template(&self, key: &str) -> Option<&str> {
        self.templates.get(key).copied()
    }
}

const ENGLISH: &[(&str, &str)] = &[
    ("stats.title", "Player Statistics"),
    ("stats.currentsession.minutes", "Current session: {0} minutes"),
    ("stats.currentsession.hours", "Current session: {0}h {1}m"),
    ("stats.totalplaytime.minutes", "Total playtime: {0} minutes"),
    ("stats.totalplaytime.hours", "Total playtime: {0}h {1}m"),
    ("stats.totalsessions", "Total sessions: {0}"),
    ("stats.totalplayers", "Players on record: {0}"),
    ("rethrow.not_found", "No throw found at index {0}"),
    ("rethrow.success", "Rethrew grenade #{0}: {1}"),
    ("player.welcome", "Welcome {0}!"),
    ("player.nodata", "No player data found"),
    ("commands.hello", "Hello {0}!"),
    ("commands.help", "Available commands"),
    ("playtime.current.hours", "Current session: {0}h {1}m"),
    ("playtime.current.minutes", "Current session: {0} minutes"),
    ("playtime.total.hours", "Total playtime: {0}h {1}m"),
    ("playtime.total.minutes", "Total playtime: {0} minutes"),
];

const CHINESE: &[(&str, &str)] = &[
    ("stats.title", "玩家统计信息"),
    ("stats.currentsession.minutes", "本次游戏时间：{0} 分钟"),
    ("stats.currentsession.hours", "本次游戏时间：{0}小时 {1}分钟"),
    ("stats.totalplaytime.minutes", "总游戏时间：{0} 分钟"),
    ("stats.totalplaytime.hours", "总游戏时间：{0}小时 {1}分钟"),
    ("stats.totalsessions", "总游戏次数：{0}"),
    ("stats.totalplayers", "服务器记录玩家数：{0}"),
    ("rethrow.not_found", "❌ 没有找到第 {0} 个投掷记录"),
    ("rethrow.success", "✅ 重投第 {0} 个道具: {1}"),
    ("player.welcome", "欢迎 {0}！"),
    ("player.nodata", "未找到玩家数据"),
    ("commands.hello", "你好 {0}！"),
    ("commands.help", "可用命令列表"),
    ("playtime.current.hours", "当前会话时间：{0}小时 {1}分钟"),
    ("playtime.current.minutes", "当前会话时间：{0}分钟"),
    ("playtime.total.hours", "总游戏时间：{0}小时 {1}分钟"),
    ("playtime.total.minutes", "总游戏时间：{0}分钟"),
];
