//! Centralized icon definitions.
//!
//! Icon theme is configured in `config.rs` via `ICON_THEME`.
//! This module maps semantic icon names to the selected theme's icons.

use icondata::Icon;

use crate::config::IconTheme;

// =============================================================================
// Theme Imports
// =============================================================================

mod lucide {
    pub use icondata::{
        LuCheck as Success, LuChevronRight as ChevronRight, LuClipboard as Copy,
        LuDownload as Download, LuFile as File, LuFolder as Folder, LuGauge as Dashboard,
        LuHouse as Home, LuInfo as Info, LuLayers as Replicas, LuLogOut as Logout,
        LuMapPin as Location, LuPencil as Edit, LuPlus as Plus, LuRefreshCw as Refresh,
        LuServer as Server, LuTrash2 as Trash, LuUndo2 as Restore, LuUser as User,
        LuUsers as Users, LuX as Close, LuX as Error,
    };
}

mod bootstrap {
    pub use icondata::{
        BsArrowClockwise as Refresh, BsArrowCounterclockwise as Restore,
        BsBoxArrowRight as Logout, BsCheckCircleFill as Success, BsChevronRight as ChevronRight,
        BsClipboard as Copy, BsDownload as Download, BsExclamationCircleFill as Error,
        BsFileEarmark as File, BsFolderFill as Folder, BsGeoAltFill as Location,
        BsHddStack as Server, BsHouseFill as Home, BsInfoCircleFill as Info,
        BsLayers as Replicas, BsPencil as Edit, BsPeople as Users, BsPerson as User,
        BsPlusLg as Plus, BsSpeedometer2 as Dashboard, BsTrash as Trash, BsXLg as Close,
    };
}

// =============================================================================
// Icon Constants (selected based on theme)
// =============================================================================

macro_rules! themed_icon {
    ($name:ident, $theme_name:ident) => {
        pub const $name: Icon = match crate::config::ICON_THEME {
            IconTheme::Lucide => lucide::$theme_name,
            IconTheme::Bootstrap => bootstrap::$theme_name,
        };
    };
}

themed_icon!(CHEVRON_RIGHT, ChevronRight);
themed_icon!(HOME, Home);
themed_icon!(FOLDER, Folder);
themed_icon!(FILE, File);
themed_icon!(DOWNLOAD, Download);
themed_icon!(COPY, Copy);
themed_icon!(TRASH, Trash);
themed_icon!(RESTORE, Restore);
themed_icon!(REPLICAS, Replicas);
themed_icon!(LOCATION, Location);
themed_icon!(REFRESH, Refresh);
themed_icon!(EDIT, Edit);
themed_icon!(PLUS, Plus);
themed_icon!(CLOSE, Close);
themed_icon!(SERVER, Server);
themed_icon!(DASHBOARD, Dashboard);
themed_icon!(USER, User);
themed_icon!(USERS, Users);
themed_icon!(LOGOUT, Logout);
themed_icon!(INFO, Info);
themed_icon!(SUCCESS, Success);
themed_icon!(ERROR, Error);
