pub mod special;

pub use special::{
    check_velocity, lorentz_factor, set_speed_of_light, speed_of_light, LorentzTransform,
    ObserverFrame, SpeedOfLight,
};
