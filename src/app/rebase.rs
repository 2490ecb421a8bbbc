use super::rooms::RenderContext;
use super::session::EditorSession;

/// Natural size every page-context background was authored against. Zones
/// saved before backgrounds were re-exported at other resolutions are still
/// in this space and need rescaling on load.
pub const PAGE_BASELINE: (f32, f32) = (1280.0, 896.0);

/// Rescales the session's zones from the canonical baseline to the decoded
/// background's natural size. Applies at most once per room/size pair; the
/// memo key survives repeated layout passes over the same image. Returns
/// whether a rescale happened.
pub fn maybe_rebase(
    session: &mut EditorSession,
    context: RenderContext,
    nat_w: f32,
    nat_h: f32,
) -> bool {
    if context != RenderContext::Page {
        return false;
    }
    if nat_w <= 0.0 || nat_h <= 0.0 {
        return false;
    }
    let (base_w, base_h) = PAGE_BASELINE;
    if (nat_w - base_w).abs() < 1.0 && (nat_h - base_h).abs() < 1.0 {
        return false;
    }
    let key = format!("{}|{}x{}", session.room, nat_w, nat_h);
    if session.rebase_key == key {
        return false;
    }
    session.store.scale_all(nat_w / base_w, nat_h / base_h);
    session.rebase_key = key;
    true
}
