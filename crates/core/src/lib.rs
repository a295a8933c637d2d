//! Split-screen keratitis vision simulation.
//!
//! Each captured frame is split at a movable column: the left side is shown
//! as-is, the right side is blurred and hazed according to the selected
//! severity stage, and a divider marks the boundary.

pub mod compositing {
    pub mod compositor_factory;
    pub mod divider;
    pub mod frame_compositor;
}

pub mod degradation {
    pub mod domain {
        pub mod degradation_filter;
        pub mod noise_synthesizer;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod session_logger;
    pub mod simulation_session;
}

pub mod settings {
    pub mod live_settings;
    pub mod simulator_config;
}

pub mod severity {
    pub mod severity_level;
    pub mod severity_profile;
}

pub mod shared {
    pub mod constants;
    pub mod error;
    pub mod frame;
}

pub mod video {
    pub mod domain {
        pub mod frame_sink;
        pub mod frame_source;
    }
    pub mod infrastructure;
}
