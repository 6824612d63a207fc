pub mod controls;
pub mod seek_bar;

pub use controls::{
    ControlsView, ControlsVisibility, SkipSegmentButton, TransportAction,
    controls_view,
};
pub use seek_bar::{
    ChapterMark, HoverPreview, PointerEvent, SeekBar, SeekBarView, SeekGesture,
    calculate_seek_position,
};
