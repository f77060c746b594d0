pub mod anchored_web_view;
pub mod domain;
pub mod panel_rig;
pub mod plane_web_view_placer;

#[cfg(test)]
mod test_doubles;
