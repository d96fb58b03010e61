use serde::Serialize;


/// Where the index chunks of one zone (map) start in the archive.
/// All offsets are absolute, `None` until the matching chunk is met.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ZoneEntry {
    pub izon_offset: Option<u32>,
    pub izax_offset: Option<u32>,
    pub izx2_offset: Option<u32>,
    pub izx3_offset: Option<u32>,
    pub izx4_offset: Option<u32>,
    pub htsp_offset: Option<u32>,
    /// offset of the first IACT met for this zone
    pub iact_offset: Option<u32>,
    pub iact_offsets: Vec<u32>,
    pub num_iacts: u32,
}


/// Zones in archive order. Allocated zeroed by the ZONE chunk.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ZoneTable {
    zones: Vec<ZoneEntry>,
}

impl ZoneTable {
    /// drops previous entries and creates `count` unset ones
    pub fn allocate(&mut self, count: usize) {
        self.zones = vec![ZoneEntry::default(); count];
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// 0-based access
    pub fn get(&self, index: usize) -> Option<&ZoneEntry> {
        self.zones.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ZoneEntry> {
        self.zones.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoneEntry> {
        self.zones.iter()
    }
}


/// The "current zone" that index chunks attach themselves to.
///
/// Index chunks carry no zone id, they apply to whatever zone the counter
/// selects. The counter is 1-based, 0 means nothing has been selected yet.
/// Transitions per tag family:
/// - IZON: `advance`, then record
/// - ZAUX, ZAX2, ZAX3, ZAX4, ACTN, HTSP: `reset`
/// - IZAX: record, then `advance` in Indy archives
/// - IZX2, IZX3, IZX4: record only
/// - HTSP entries: `select(id)`
/// - first IACT of a zone: record, then `advance` in Indy archives
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ZoneCursor {
    counter: u32,
}

impl ZoneCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// next index chunk applies to zone 1
    pub fn reset(&mut self) {
        self.counter = 1;
    }

    pub fn advance(&mut self) {
        self.counter += 1;
    }

    /// select the zone with an explicit 0-based id
    pub fn select(&mut self, id: u16) {
        self.counter = id as u32 + 1;
    }

    /// 1-based counter value
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// 0-based table index, `None` before anything was selected
    pub fn index(&self) -> Option<usize> {
        self.counter.checked_sub(1).map(|i| i as usize)
    }
}
