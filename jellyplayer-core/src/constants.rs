pub mod seeking {
    /// Rewind and fast-forward buttons and arrow keys.
    pub const MANUAL_STEP_SECS: i64 = 15;
    /// OS media keys that do not carry their own offset.
    pub const MEDIA_KEY_DEFAULT_SECS: i64 = 10;
    /// Previous-chapter presses this close to a chapter start skip past it.
    /// Zero keeps the strict "starts before the position" rule.
    pub const CHAPTER_RESTART_THRESHOLD_SECS: u64 = 0;
}

pub mod trickplay {
    /// Share of the rendered player width a preview thumbnail may occupy.
    pub const SCREEN_FRACTION: f64 = 0.2;
}

pub mod reporting {
    pub const PROGRESS_INTERVAL_MS: u64 = 10_000;
}

pub mod controls {
    pub const AUTO_HIDE_MS: u64 = 3_000;
}

pub mod seek_bar {
    pub const VISUAL_HEIGHT: f32 = 4.0;
    /// Presses within this multiple of the visual height count as hits.
    pub const CLICK_TOLERANCE_MULTIPLIER: f32 = 7.0;
}

pub mod volume {
    pub const DEFAULT: f64 = 0.8;
}
