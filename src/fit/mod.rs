//! Fitting a native image size into a measured container.

use crate::geometry::{Dimensions, ScaleFactor};

/// Displayed size of the image and the factor that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub displayed: Dimensions,
    pub scale: ScaleFactor,
}

/// Largest aspect-preserving size of `native` that fits inside `container`.
///
/// Returns `None` when either size has a zero axis. The scale comes from the
/// limiting axis and is fixed before the displayed size is rounded, so the
/// forward and reverse projections share one divisor.
pub fn compute_fit(native: Dimensions, container: Dimensions) -> Option<Fit> {
    if !native.has_area() || !container.has_area() {
        return None;
    }
    let scale_x = f64::from(container.width) / f64::from(native.width);
    let scale_y = f64::from(container.height) / f64::from(native.height);
    let scale = ScaleFactor::new(scale_x.min(scale_y))?;
    let displayed = Dimensions::new(
        fitted_extent(native.width, scale, container.width),
        fitted_extent(native.height, scale, container.height),
    );
    Some(Fit { displayed, scale })
}

fn fitted_extent(native: u32, scale: ScaleFactor, bound: u32) -> u32 {
    let scaled = (f64::from(native) * scale.get()).round() as u32;
    scaled.clamp(1, bound)
}

/// Tracks the latest container measurement and the fit derived from it.
///
/// One resolver lives as long as the widget. Swapping or unloading the image
/// goes through [`set_native`](Self::set_native) and
/// [`clear_native`](Self::clear_native), so the generation never restarts.
#[derive(Debug, Clone, Default)]
pub struct ContainerFitResolver {
    native: Option<Dimensions>,
    container: Option<Dimensions>,
    fit: Option<Fit>,
    generation: u64,
}

impl ContainerFitResolver {
    pub fn new(native: Dimensions) -> Self {
        Self {
            native: Some(native),
            ..Self::default()
        }
    }

    pub fn native(&self) -> Option<Dimensions> {
        self.native
    }

    pub fn container(&self) -> Option<Dimensions> {
        self.container
    }

    /// Current fit; `None` until both a native size and a measurement with
    /// area are known.
    pub fn fit(&self) -> Option<Fit> {
        self.fit
    }

    /// Bumped every time the fit value changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn observe(&mut self, container: Dimensions) -> Option<Fit> {
        self.container = Some(container);
        self.recompute();
        self.fit
    }

    pub fn set_native(&mut self, native: Dimensions) -> Option<Fit> {
        self.native = Some(native);
        self.recompute();
        self.fit
    }

    /// Forgets the image size while keeping the last measurement.
    pub fn clear_native(&mut self) {
        self.native = None;
        self.recompute();
    }

    fn recompute(&mut self) {
        let next = self
            .native
            .zip(self.container)
            .and_then(|(native, container)| compute_fit(native, container));
        if next != self.fit {
            self.generation = self.generation.wrapping_add(1);
            tracing::debug!(
                native = ?self.native,
                container = ?self.container,
                displayed = ?next.map(|fit| fit.displayed),
                scale = next.map(|fit| fit.scale.get()),
                generation = self.generation,
                "container fit recomputed"
            );
        }
        self.fit = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_fit_limits_by_width_for_wide_images() {
        let fit = compute_fit(Dimensions::new(1000, 500), Dimensions::new(400, 400))
            .expect("fit should exist");
        assert_eq!(fit.displayed, Dimensions::new(400, 200));
        assert!((fit.scale.get() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn compute_fit_limits_by_height_for_tall_images() {
        let fit = compute_fit(Dimensions::new(300, 900), Dimensions::new(400, 300))
            .expect("fit should exist");
        assert_eq!(fit.displayed, Dimensions::new(100, 300));
    }

    #[test]
    fn compute_fit_upscales_small_images() {
        let fit = compute_fit(Dimensions::new(160, 90), Dimensions::new(1280, 1280))
            .expect("fit should exist");
        assert_eq!(fit.displayed, Dimensions::new(1280, 720));
        assert_eq!(fit.scale.get(), 8.0);
    }

    #[test]
    fn compute_fit_is_absent_for_zero_area_container() {
        let native = Dimensions::new(1000, 500);
        assert!(compute_fit(native, Dimensions::new(0, 5)).is_none());
        assert!(compute_fit(native, Dimensions::new(5, 0)).is_none());
    }

    #[test]
    fn compute_fit_never_collapses_displayed_axis_to_zero() {
        let fit = compute_fit(Dimensions::new(10_000, 1), Dimensions::new(100, 100))
            .expect("fit should exist");
        assert_eq!(fit.displayed, Dimensions::new(100, 1));
    }

    #[test]
    fn resolver_is_unavailable_before_first_measurement() {
        let resolver = ContainerFitResolver::new(Dimensions::new(640, 480));
        assert!(resolver.fit().is_none());
        assert!(resolver.container().is_none());
        assert_eq!(resolver.generation(), 0);
    }

    #[test]
    fn resolver_recomputes_on_every_resize() {
        let mut resolver = ContainerFitResolver::new(Dimensions::new(1000, 500));

        let first = resolver.observe(Dimensions::new(400, 400)).unwrap();
        assert_eq!(first.displayed, Dimensions::new(400, 200));
        assert_eq!(resolver.generation(), 1);

        let second = resolver.observe(Dimensions::new(800, 800)).unwrap();
        assert_eq!(second.displayed, Dimensions::new(800, 400));
        assert_eq!(resolver.generation(), 2);

        assert!(resolver.observe(Dimensions::new(0, 800)).is_none());
        assert!(resolver.fit().is_none());
        assert_eq!(resolver.generation(), 3);
    }

    #[test]
    fn resolver_keeps_generation_when_fit_is_unchanged() {
        let mut resolver = ContainerFitResolver::new(Dimensions::new(1000, 500));
        resolver.observe(Dimensions::new(400, 400));
        resolver.observe(Dimensions::new(400, 400));
        assert_eq!(resolver.generation(), 1);
    }

    #[test]
    fn resolver_refits_when_native_size_changes() {
        let mut resolver = ContainerFitResolver::new(Dimensions::new(1000, 500));
        resolver.observe(Dimensions::new(400, 400));

        let fit = resolver.set_native(Dimensions::new(200, 400)).unwrap();
        assert_eq!(fit.displayed, Dimensions::new(200, 400));
        assert_eq!(fit.scale.get(), 1.0);
        assert_eq!(resolver.native(), Some(Dimensions::new(200, 400)));
    }

    #[test]
    fn clearing_native_keeps_container_and_generation_moves_forward() {
        let mut resolver = ContainerFitResolver::default();
        assert!(resolver.observe(Dimensions::new(400, 400)).is_none());
        assert_eq!(resolver.generation(), 0);

        resolver.set_native(Dimensions::new(1000, 500));
        assert_eq!(resolver.generation(), 1);

        resolver.clear_native();
        assert!(resolver.fit().is_none());
        assert_eq!(resolver.container(), Some(Dimensions::new(400, 400)));
        assert_eq!(resolver.generation(), 2);

        let fit = resolver
            .set_native(Dimensions::new(1000, 500))
            .expect("fit should exist");
        assert_eq!(fit.displayed, Dimensions::new(400, 200));
        assert_eq!(resolver.generation(), 3);
    }
}
