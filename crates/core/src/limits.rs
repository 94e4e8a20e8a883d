//! Field length caps, measured in characters after trimming.

pub const USER_NAME_MAX: usize = 50;
pub const EMAIL_MAX: usize = 240;
/// Password cap in bytes; the adaptive hash never sees more than this.
pub const PASSWORD_MAX_BYTES: usize = 72;
pub const PICTURE_URL_MAX: usize = 2048;

pub const GROUP_NAME_MAX: usize = 32;
pub const GROUP_DESCRIPTION_MAX: usize = 512;

pub const LIST_NAME_MAX: usize = 50;
pub const LIST_DESCRIPTION_MAX: usize = 512;

pub const TASK_TITLE_MAX: usize = 128;
pub const TASK_HEADLINE_MAX: usize = 64;
pub const TASK_DESCRIPTION_MAX: usize = 512;

pub const STEP_DESCRIPTION_MAX: usize = 512;

pub const TAG_NAME_MAX: usize = 32;
pub const TAG_COLOR_MAX: usize = 7;

pub const ATTACHMENT_NAME_MAX: usize = 255;
pub const ATTACHMENT_URL_MAX: usize = 2048;
