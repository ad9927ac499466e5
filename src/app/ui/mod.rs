mod belief;
mod emotion;
mod overlays;
pub(super) mod selection;
mod split;
