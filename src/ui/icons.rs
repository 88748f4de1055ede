//! Shared UI icons.
//!
//! Each icon falls back to a plain-text marker on terminals without emoji
//! support.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "*");

// Phase indicators
pub static OPEN: Emoji<'_, '_> = Emoji("▶️  ", "[>]");
pub static LOCK: Emoji<'_, '_> = Emoji("🔒 ", "[L]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!]");

// File and progress indicators
pub static FILE_NEW: Emoji<'_, '_> = Emoji("📄 ", "+");
pub static PROGRESS: Emoji<'_, '_> = Emoji("📊 ", "[PROG]");
