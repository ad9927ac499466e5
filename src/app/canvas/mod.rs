mod input;
mod paint;

pub(in crate::app) use input::TouchTracker;
