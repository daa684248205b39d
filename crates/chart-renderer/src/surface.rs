use dashboard_core::DashboardResult;
use std::fs;
use std::path::{Path, PathBuf};

use crate::chart::ChartSpec;

/// Identifies one chart mounted on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountId(pub u64);

/// Something a chart can be drawn on.
pub trait ChartSurface {
    fn mount(&mut self, spec: &ChartSpec) -> DashboardResult<MountId>;

    fn unmount(&mut self, id: MountId) -> DashboardResult<()>;
}

/// Owned reference to a mounted chart. Dispose it before drawing a
/// replacement on the same surface.
#[must_use = "a mounted chart stays on its surface until disposed"]
#[derive(Debug)]
pub struct ChartHandle {
    id: MountId,
    spec: ChartSpec,
}

impl ChartHandle {
    pub fn mount<S: ChartSurface + ?Sized>(
        surface: &mut S,
        spec: ChartSpec,
    ) -> DashboardResult<Self> {
        let id = surface.mount(&spec)?;
        Ok(Self { id, spec })
    }

    pub fn id(&self) -> MountId {
        self.id
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    pub fn dispose<S: ChartSurface + ?Sized>(self, surface: &mut S) -> DashboardResult<()> {
        surface.unmount(self.id)
    }
}

/// Holds at most one live chart and tears it down before showing the next.
#[derive(Debug, Default)]
pub struct ChartSlot {
    current: Option<ChartHandle>,
}

impl ChartSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&ChartHandle> {
        self.current.as_ref()
    }

    /// Dispose the current chart, then mount `spec` in its place.
    pub fn show<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        spec: ChartSpec,
    ) -> DashboardResult<&ChartHandle> {
        self.clear(surface)?;
        let handle: &ChartHandle = self.current.insert(ChartHandle::mount(surface, spec)?);
        Ok(handle)
    }

    pub fn clear<S: ChartSurface + ?Sized>(&mut self, surface: &mut S) -> DashboardResult<()> {
        if let Some(old) = self.current.take() {
            old.dispose(surface)?;
        }
        Ok(())
    }
}

/// Writes the mounted chart as ApexCharts options JSON to a file.
pub struct JsonFileSurface {
    path: PathBuf,
    next_id: u64,
    mounted: Option<MountId>,
}

impl JsonFileSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            next_id: 0,
            mounted: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChartSurface for JsonFileSurface {
    fn mount(&mut self, spec: &ChartSpec) -> DashboardResult<MountId> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(spec)?;
        fs::write(&self.path, body)?;

        self.next_id += 1;
        let id = MountId(self.next_id);
        self.mounted = Some(id);
        tracing::debug!("Mounted chart {:?} at {}", id, self.path.display());
        Ok(id)
    }

    fn unmount(&mut self, id: MountId) -> DashboardResult<()> {
        // A stale handle must not remove a newer chart.
        if self.mounted != Some(id) {
            return Ok(());
        }
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.mounted = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Curve, SeriesKind};
    use std::collections::HashSet;

    #[derive(Default)]
    struct CountingSurface {
        next: u64,
        live: HashSet<MountId>,
        mounts: usize,
    }

    impl ChartSurface for CountingSurface {
        fn mount(&mut self, _spec: &ChartSpec) -> DashboardResult<MountId> {
            self.next += 1;
            self.mounts += 1;
            let id = MountId(self.next);
            self.live.insert(id);
            Ok(id)
        }

        fn unmount(&mut self, id: MountId) -> DashboardResult<()> {
            self.live.remove(&id);
            Ok(())
        }
    }

    fn empty_spec() -> ChartSpec {
        ChartSpec {
            chart_type: SeriesKind::Line,
            curve: Curve::Smooth,
            series: vec![],
        }
    }

    #[test]
    fn test_slot_disposes_previous_chart() {
        let mut surface = CountingSurface::default();
        let mut slot = ChartSlot::new();

        for _ in 0..5 {
            slot.show(&mut surface, empty_spec()).unwrap();
            assert_eq!(surface.live.len(), 1);
        }
        assert_eq!(surface.mounts, 5);
        assert_eq!(slot.current().map(|h| h.id()), Some(MountId(5)));

        slot.clear(&mut surface).unwrap();
        assert!(surface.live.is_empty());
        assert!(slot.current().is_none());
    }

    #[test]
    fn test_handle_dispose() {
        let mut surface = CountingSurface::default();
        let handle = ChartHandle::mount(&mut surface, empty_spec()).unwrap();
        assert_eq!(surface.live.len(), 1);
        handle.dispose(&mut surface).unwrap();
        assert!(surface.live.is_empty());
    }

    #[test]
    fn test_json_file_surface() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts").join("forecast_chart.json");
        let mut surface = JsonFileSurface::new(&path);
        let mut slot = ChartSlot::new();

        slot.show(&mut surface, empty_spec()).unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["chart"]["type"], "line");

        let stale = ChartHandle::mount(&mut surface, empty_spec()).unwrap();
        slot.show(&mut surface, empty_spec()).unwrap();
        stale.dispose(&mut surface).unwrap();
        assert!(path.exists());

        slot.clear(&mut surface).unwrap();
        assert!(!path.exists());
    }
}
