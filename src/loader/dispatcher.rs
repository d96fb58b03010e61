use log::{debug, info, trace, warn};
use crate::dta::{AmbientDamage, ByteCursor, CharacterRecord, Error, GameVariant, Palette, PuzzleRecord, PuzzleTable, Result, SoundNames, TileTable, VariantLayout, WeaponAssignment, ZoneCursor, ZoneEntry, SENTINEL_ID};
use crate::dta::tiledata::{STARTUP_TEXTURE_SLOT, STARTUP_WIDTH, TILE_CELL_SIZE, TILE_PIXELS, TILE_TEXTURE_SLOTS, TILE_WIDTH};
use crate::dta::variant::ZoneHeader;
use crate::loader::assets::AssetTables;
use crate::loader::collaborators::{ScreenRefresh, TextureSink};
use crate::loader::tags::{is_tag_start, ChunkTag};


/// progress that has to pass between two screen refreshes
const REFRESH_STEP: f32 = 0.1;
/// TILE refreshes the screen every this many tiles
const TILE_REFRESH_INTERVAL: u64 = 0x100;
/// a hotspot record skipped by HTSP
const HOTSPOT_SIZE: i64 = 0xC;


#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DispatchState {
    /// about to read the next tag
    Scanning,
    /// a tag was read at `tag_start` and waits for its handler
    Dispatching { tag_start: u64, tag: [u8; 4] },
    Done,
    Failed,
}


/// The tag driven main loop over one archive.
///
/// Owns the cursor and the tables for the whole load. Each known tag has a
/// handler that decodes its payload and names the offset the cursor must be
/// forced to afterwards, whatever the decode consumed. Unknown bytes start a
/// resync scan for the next uppercase letter.
pub struct Dispatcher<'a> {
    cursor: ByteCursor,
    layout: &'static VariantLayout,
    palette: Palette,
    textures: &'a mut dyn TextureSink,
    refresh: &'a mut dyn ScreenRefresh,

    state: DispatchState,
    zone: ZoneCursor,
    tables: AssetTables,

    progress: f32,
    last_refresh: f32,
    found: bool,    // previous tag was a known one
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        cursor: ByteCursor,
        variant: GameVariant,
        palette: Palette,
        textures: &'a mut dyn TextureSink,
        refresh: &'a mut dyn ScreenRefresh,
    ) -> Self {
        Self {
            cursor,
            layout: variant.layout(),
            palette,
            textures,
            refresh,
            state: DispatchState::Scanning,
            zone: ZoneCursor::new(),
            tables: AssetTables::new(variant),
            progress: 0.0,
            last_refresh: 0.0,
            found: true,
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// fraction of the archive behind the last tag read, 1.0 once done
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn zone_cursor(&self) -> ZoneCursor {
        self.zone
    }

    /// Runs the load to the end. The tables are only reachable through a successful result.
    pub fn run(mut self) -> Result<AssetTables> {
        trace!("Dispatcher::run");
        loop {
            if self.step()? == DispatchState::Done {
                info!("assets loaded: {}", self.tables.summary());
                return Ok(self.tables);
            }
        }
    }

    /// Performs a single state transition.
    pub fn step(&mut self) -> Result<DispatchState> {
        let next = match self.state {
            DispatchState::Scanning => self.scan(),
            DispatchState::Dispatching { tag_start, tag } => self.dispatch(tag_start, tag),
            DispatchState::Done | DispatchState::Failed => Ok(self.state),
        };

        match next {
            Ok(state) => {
                if state == DispatchState::Done {
                    self.progress = 1.0;
                }
                self.state = state;
                Ok(state)
            }
            Err(e) => {
                self.state = DispatchState::Failed;
                Err(e)
            }
        }
    }

    fn scan(&mut self) -> Result<DispatchState> {
        if self.cursor.remaining() < 4 {
            warn!("archive ended at {:#x} without ENDF", self.cursor.position());
            self.tables.stats.truncated = true;
            return Ok(DispatchState::Done);
        }

        let tag_start = self.cursor.position();
        let tag = self.cursor.read_tag()?;

        self.progress = tag_start as f32 / self.cursor.len() as f32;
        if self.found && self.progress - self.last_refresh > REFRESH_STEP {
            self.refresh.refresh(self.progress);
            self.last_refresh = self.progress;
        }

        Ok(DispatchState::Dispatching { tag_start, tag })
    }

    fn dispatch(&mut self, tag_start: u64, raw: [u8; 4]) -> Result<DispatchState> {
        let tag = match ChunkTag::from_bytes(&raw) {
            None => {
                self.found = false;
                return self.resync(tag_start);
            }
            Some(ChunkTag::Endf) => {
                debug!("found ENDF at {tag_start:#x}");
                return Ok(DispatchState::Done);
            }
            Some(tag) => tag,
        };

        self.found = true;
        self.tables.stats.chunks += 1;

        if let Some(target) = self.handle(tag, tag_start)? {
            self.cursor.seek_to(target);
        }

        let position = self.cursor.position();
        if position <= tag_start {
            return Err(Error::Stalled { tag: tag.as_str(), offset: tag_start, target: position });
        }

        Ok(DispatchState::Scanning)
    }

    /// Skips bytes that cannot start a tag. Starts one byte after the
    /// rejected tag and stops in front of the first uppercase letter.
    fn resync(&mut self, tag_start: u64) -> Result<DispatchState> {
        self.cursor.seek_to(tag_start + 1);
        loop {
            match self.cursor.read_u8() {
                Ok(b) if is_tag_start(b) => break,
                Ok(_) => {}
                Err(e) if e.is_out_of_bounds() => {
                    debug!("resync from {tag_start:#x} reached the end of the archive");
                    return Ok(DispatchState::Done);
                }
                Err(e) => return Err(e),
            }
        }
        self.cursor.seek_by(-1);

        let skipped = self.cursor.position() - tag_start;
        trace!("resync skipped {skipped} bytes at {tag_start:#x}");
        self.tables.stats.resyncs += 1;
        self.tables.stats.skipped_bytes += skipped;
        Ok(DispatchState::Scanning)
    }

    /// Decodes one chunk, the cursor stands right after its tag.
    /// Returns where the cursor has to be forced to, `None` keeps it where the decode left it.
    fn handle(&mut self, tag: ChunkTag, tag_start: u64) -> Result<Option<u64>> {
        match tag {
            ChunkTag::Vers => {
                let version = self.cursor.read_u32()?;
                debug!("found VERS at {tag_start:#x}, version number {version:#x}");
                self.tables.version = Some(version);
                Ok(Some(tag_start + 8))
            }
            ChunkTag::Stup => self.read_startup(tag_start).map(Some),
            ChunkTag::Zone => self.read_zones(tag_start).map(Some),
            ChunkTag::Izon => {
                self.zone.advance();
                self.record_zone_offset(tag, |z, offset| z.izon_offset = Some(offset), tag_start);
                let len = self.cursor.read_u32()?;
                Ok(Some(tag_start + len as u64))
            }
            ChunkTag::Zaux | ChunkTag::Zax2 | ChunkTag::Zax3 | ChunkTag::Zax4 | ChunkTag::Actn => {
                let len = self.cursor.read_u32()?;
                debug!("found {} at {tag_start:#x}, len {len:#x}", tag.as_str());
                self.zone.reset();
                Ok(Some(tag_start + 8))
            }
            ChunkTag::Izax => {
                self.record_zone_offset(tag, |z, offset| z.izax_offset = Some(offset), tag_start);
                if self.layout.izax_advances_zone {
                    self.zone.advance();
                }
                let len = self.cursor.read_u32()?;
                Ok(Some(tag_start + len as u64))
            }
            ChunkTag::Izx2 => {
                self.record_zone_offset(tag, |z, offset| z.izx2_offset = Some(offset), tag_start);
                let len = self.cursor.read_u32()?;
                Ok(Some(tag_start + len as u64))
            }
            ChunkTag::Izx3 => {
                self.record_zone_offset(tag, |z, offset| z.izx3_offset = Some(offset), tag_start);
                let len = self.cursor.read_u32()?;
                Ok(Some(tag_start + len as u64))
            }
            ChunkTag::Izx4 => {
                self.record_zone_offset(tag, |z, offset| z.izx4_offset = Some(offset), tag_start);
                let len = self.cursor.read_u32()?;
                Ok(Some(tag_start + 8 + len as u64 + 2))
            }
            ChunkTag::Htsp => self.read_hotspots(tag_start).map(|_| None),
            ChunkTag::Iact => self.read_actions(tag_start),
            ChunkTag::Snds => self.read_sounds(tag_start).map(Some),
            ChunkTag::Tile => self.read_tiles(tag_start).map(Some),
            ChunkTag::Puz2 => {
                let len = self.cursor.read_u32()?;
                debug!("found PUZ2 at {tag_start:#x}, len {len:#x}");
                self.tables.puzzles = PuzzleTable::default();
                Ok(Some(tag_start + 10))
            }
            ChunkTag::Ipuz => {
                let id = self.read_prefix(tag_start)?;
                let puzzle = PuzzleRecord::read(&mut self.cursor, self.layout, id)?;
                trace!("found IPUZ {id:#x} at {tag_start:#x}");
                let target = tag_start + puzzle.length as u64 + 0xA;
                self.tables.puzzles.insert(puzzle);
                Ok(Some(target))
            }
            ChunkTag::Char => self.read_characters(tag_start).map(Some),
            ChunkTag::Chwp => self.read_weapons(tag_start).map(Some),
            ChunkTag::Caux => self.read_ambient_damage(tag_start).map(Some),
            ChunkTag::Anam | ChunkTag::Pnam => {
                debug!("found {} at {tag_start:#x}", tag.as_str());
                Ok(Some(tag_start + 4))
            }
            ChunkTag::Tnam => self.read_tile_names(tag_start).map(Some),
            ChunkTag::Endf => Ok(None),
        }
    }

    /// the u16 stored right in front of a tag (IACT count, IPUZ id)
    fn read_prefix(&mut self, tag_start: u64) -> Result<u16> {
        let offset = tag_start.checked_sub(2).ok_or(Error::OutOfBounds {
            offset: tag_start,
            need: 2,
            len: self.cursor.len(),
        })?;
        self.cursor.read_u16_at(offset)
    }

    /// the zone entry the current zone counter points at, `None` and a warning if there is none
    fn current_zone(&mut self, tag: ChunkTag) -> Option<&mut ZoneEntry> {
        let zones = self.tables.zones.len();
        match self.zone.index() {
            Some(index) if index < zones => self.tables.zones.get_mut(index),
            _ => {
                warn!("{} refers to zone {} but the archive declares {zones} zones", tag.as_str(), self.zone.counter());
                self.tables.stats.dangling_references += 1;
                None
            }
        }
    }

    fn record_zone_offset(&mut self, tag: ChunkTag, set: impl FnOnce(&mut ZoneEntry, u32), tag_start: u64) {
        let counter = self.zone.counter();
        if let Some(zone) = self.current_zone(tag) {
            set(zone, tag_start as u32);
            trace!("found {} for zone {counter} at {tag_start:#x}", tag.as_str());
        }
    }

    fn read_startup(&mut self, tag_start: u64) -> Result<u64> {
        debug!("found STUP at {tag_start:#x}");
        let len = self.cursor.read_u32()?;

        let indices = self.cursor.read_bytes((STARTUP_WIDTH * STARTUP_WIDTH) as usize)?;
        let pixels = self.palette.decode_pixels(&indices);
        self.textures.submit_tile_texture(STARTUP_WIDTH, &pixels, STARTUP_TEXTURE_SLOT);
        self.tables.startup_image = true;
        self.refresh.refresh(self.progress);

        Ok(tag_start + len as u64 + 8)
    }

    fn read_zones(&mut self, tag_start: u64) -> Result<u64> {
        let count = match self.layout.zone_header {
            ZoneHeader::CountFirst => {
                let count = self.cursor.read_u16()?;
                let unknown = self.cursor.read_u16()?;
                let len = self.cursor.read_u32()?;
                debug!("found ZONE at {tag_start:#x}, unk {unknown:#x}, len {len:#x}");
                count
            }
            ZoneHeader::LengthFirst => {
                let len = self.cursor.read_u32()?;
                let count = self.cursor.read_u16()?;
                debug!("found ZONE at {tag_start:#x}, len {len:#x}");
                count
            }
        };

        info!("{count} maps in archive");
        self.tables.zones.allocate(count as usize);
        Ok(tag_start + self.layout.zone_header_size)
    }

    /// HTSP has no usable length, the list ends with a sentinel id
    /// and the cursor stays right after it.
    fn read_hotspots(&mut self, tag_start: u64) -> Result<()> {
        let len = self.cursor.read_u32()?;
        debug!("found HTSP at {tag_start:#x}, len {len:#x}");
        self.zone.reset();

        loop {
            let id = self.cursor.read_u16()?;
            let offset = self.cursor.position();
            if id == SENTINEL_ID {
                break;
            }

            self.zone.select(id);
            if let Some(zone) = self.current_zone(ChunkTag::Htsp) {
                zone.htsp_offset = Some(offset as u32);
            }
            trace!("found zone {id:#x} HTSP at {offset:#x}");

            let count = self.cursor.read_u16()?;
            self.cursor.seek_by(HOTSPOT_SIZE * count as i64);
        }
        Ok(())
    }

    /// The first IACT met for a zone indexes the whole group: the count in
    /// front of the tag is read, then the stream is walked tag by tag until
    /// count + 1 IACTs were seen or PUZ2 shows up. Later IACTs of the same
    /// zone only reseek.
    fn read_actions(&mut self, tag_start: u64) -> Result<Option<u64>> {
        let mut base = tag_start;
        let first = self.current_zone(ChunkTag::Iact).map(|z| z.iact_offset.is_none()).unwrap_or(false);

        if first {
            let count = self.read_prefix(tag_start)?;
            let (offsets, rewind_to) = self.scan_actions(tag_start, count)?;

            if self.layout.iact_has_length && offsets.len() == count as usize + 2 {
                // all found, the last one belongs to the next group
                base = offsets[offsets.len() - 2] as u64;
            }

            debug!("found {count} IACT at {tag_start:#x}, {} indexed", offsets.len() - 1);
            if let Some(zone) = self.current_zone(ChunkTag::Iact) {
                zone.iact_offset = Some(tag_start as u32);
                zone.num_iacts = (offsets.len() - 1) as u32;
                zone.iact_offsets = offsets;
            }

            // a group holding only itself goes on after its tag
            self.cursor.seek_to(rewind_to.max(tag_start + 4));
            if self.layout.iact_advances_zone {
                self.zone.advance();
            }
        }

        if !self.layout.iact_has_length {
            return Ok(None);
        }

        self.cursor.seek_to(base + 4);
        let len = self.cursor.read_u32()?;
        Ok(Some(base + len as u64 + 8))
    }

    /// Returns the offsets of the group (starting with `tag_start` itself, which
    /// the walk then meets again) and the offset of the last tag looked at.
    fn scan_actions(&mut self, tag_start: u64, count: u16) -> Result<(Vec<u32>, u64)> {
        let mut offsets = vec![tag_start as u32];
        let mut remaining = count as u32 + 1;
        let mut rewind_to = tag_start;

        self.cursor.seek_to(tag_start);
        'walk: while remaining > 0 {
            let look_start = self.cursor.position();
            let look = match self.cursor.read_tag() {
                Ok(look) => look,
                Err(e) if e.is_out_of_bounds() => {
                    rewind_to = look_start;
                    break;
                }
                Err(e) => return Err(e),
            };

            match &look {
                b"IACT" => {
                    offsets.push(look_start as u32);
                    remaining -= 1;
                    rewind_to = look_start;
                }
                b"PUZ2" => {
                    rewind_to = look_start;
                    break;
                }
                _ => {
                    self.cursor.seek_to(look_start + 1);
                    loop {
                        match self.cursor.read_u8() {
                            Ok(b'I') | Ok(b'P') => break,
                            Ok(_) => {}
                            Err(e) if e.is_out_of_bounds() => {
                                rewind_to = self.cursor.position();
                                break 'walk;
                            }
                            Err(e) => return Err(e),
                        }
                    }
                    self.cursor.seek_by(-1);
                }
            }
        }

        Ok((offsets, rewind_to))
    }

    fn read_sounds(&mut self, tag_start: u64) -> Result<u64> {
        let len = self.cursor.read_u32()?;
        let declared = self.cursor.read_u16()?;
        debug!("found SNDS at {tag_start:#x}, {declared} sounds declared");

        let mut sounds = SoundNames::new(declared);
        // the length covers the count and every entry
        let end = tag_start + len as u64 + 8;
        while self.cursor.position() < end {
            let n = self.cursor.read_u16()? as usize;
            let name = self.cursor.read_fixed_string(n)?;
            trace!("{:#x}: {name}", sounds.len());
            sounds.push(name);
        }
        self.tables.sounds = sounds;

        Ok(end)
    }

    fn read_tiles(&mut self, tag_start: u64) -> Result<u64> {
        let len = self.cursor.read_u32()? as u64;
        let count = len / TILE_CELL_SIZE;
        debug!("found TILE at {tag_start:#x}, {count:#x} tiles");

        let mut tiles = TileTable::with_capacity(count as usize);
        for j in 0..count {
            if j % TILE_REFRESH_INTERVAL == 0 || j == count - 1 {
                trace!("{j:#x} of {count:#x}...");
                self.progress = self.cursor.position() as f32 / self.cursor.len() as f32;
                self.refresh.refresh(self.progress);
            }

            let flags = self.cursor.read_u32()?;
            let index = tiles.push(flags);
            let indices = self.cursor.read_bytes(TILE_PIXELS)?;

            if index < TILE_TEXTURE_SLOTS {
                let pixels = self.palette.decode_pixels(&indices);
                self.textures.submit_tile_texture(TILE_WIDTH, &pixels, index);
            } else {
                self.tables.stats.untextured_tiles += 1;
            }
        }

        if self.tables.stats.untextured_tiles > 0 {
            warn!("{} tiles do not fit the texture slots", self.tables.stats.untextured_tiles);
        }
        self.tables.tiles = tiles;

        Ok(tag_start + len + 8)
    }

    fn read_characters(&mut self, tag_start: u64) -> Result<u64> {
        let size = self.cursor.read_u32()? as u64;
        let record_size = self.layout.character_record_size;
        debug!("found CHAR at {tag_start:#x}, size {size:#x}");

        for _ in 0..size / record_size {
            let id = self.cursor.read_u16()?;
            let start = self.cursor.position();
            let end = start + record_size - 2;
            let character = CharacterRecord::read(&mut self.cursor, id, end)?;
            trace!("{id:#x} - {:<16} {:#x} {:#x} {:#x}", character.name, character.flags, character.misc_a, character.misc_b);
            self.tables.characters.insert(character);
            self.cursor.seek_to(end);
        }

        Ok(tag_start + size + 8)
    }

    fn read_weapons(&mut self, tag_start: u64) -> Result<u64> {
        debug!("found CHWP at {tag_start:#x}");
        let len = self.cursor.read_u32()?;

        loop {
            let character = self.cursor.read_u16()?;
            let reference = self.cursor.read_u16()?;
            let health = self.cursor.read_u16()?;
            if character == SENTINEL_ID {
                break;
            }

            self.check_character(ChunkTag::Chwp, character);
            let characters = &self.tables.characters;
            if characters.is_weapon(character) {
                if reference as usize >= self.tables.sounds.len() {
                    self.tables.stats.dangling_references += 1;
                }
                trace!("{:<16} is a weapon with sound {:<14}, health {health:#x}", characters.name(character), self.tables.sounds.get(reference));
            } else {
                let weapon = if reference == SENTINEL_ID { "none" } else { characters.name(reference) };
                trace!("{:<16} gets weapon {weapon:<25}, health {health:#x}", characters.name(character));
                if reference != SENTINEL_ID && characters.get(reference).is_none() {
                    self.tables.stats.dangling_references += 1;
                }
            }

            self.tables.characters.weapons.push(WeaponAssignment { character, reference, health });
        }

        Ok(tag_start + len as u64 + 8)
    }

    fn read_ambient_damage(&mut self, tag_start: u64) -> Result<u64> {
        debug!("found CAUX at {tag_start:#x}");
        let len = self.cursor.read_u32()?;

        loop {
            let character = self.cursor.read_u16()?;
            let damage = self.cursor.read_u16()?;
            if character == SENTINEL_ID {
                break;
            }

            self.check_character(ChunkTag::Caux, character);
            let characters = &self.tables.characters;
            if characters.is_weapon(character) {
                trace!("{:<16} is a weapon,          damage: {damage:#x}", characters.name(character));
            } else {
                trace!("{:<16} not a weapon, ambient damage: {damage:#x}", characters.name(character));
            }

            self.tables.characters.ambient_damage.push(AmbientDamage { character, damage });
        }

        Ok(tag_start + len as u64 + 8)
    }

    fn check_character(&mut self, tag: ChunkTag, id: u16) {
        if self.tables.characters.get(id).is_none() {
            warn!("{} refers to character {id:#x} which has no record", tag.as_str());
            self.tables.stats.dangling_references += 1;
        }
    }

    fn read_tile_names(&mut self, tag_start: u64) -> Result<u64> {
        debug!("found TNAM at {tag_start:#x}");
        let len = self.cursor.read_u32()? as u64;
        let width = self.layout.tile_name_width;

        self.tables.tile_names.clear();
        for _ in 0..len / self.layout.tile_name_entry_size() {
            let id = self.cursor.read_u16()?;
            if id == SENTINEL_ID {
                self.tables.tile_names.unset(id);
            } else {
                let name = self.cursor.read_fixed_string(width)?;
                self.tables.tile_names.set(id, name);
            }
        }

        Ok(tag_start + len + 8)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::dta::ByteOrder;
    use crate::loader::collaborators::{NoRefresh, TextureStore};

    struct Counter(Vec<f32>);

    /// counts submissions and remembers the highest slot
    #[derive(Default)]
    struct SlotCounter {
        submitted: u32,
        highest: Option<u32>,
    }

    impl TextureSink for SlotCounter {
        fn submit_tile_texture(&mut self, _width: u32, _pixels: &[u32], slot: u32) {
            self.submitted += 1;
            self.highest = self.highest.max(Some(slot));
        }
    }

    /// scans and dispatches one tag, returns where the cursor ended up
    fn step_tag(d: &mut Dispatcher) -> u64 {
        assert!(matches!(d.step().unwrap(), DispatchState::Dispatching { .. }));
        assert_eq!(d.step().unwrap(), DispatchState::Scanning);
        d.position()
    }

    impl ScreenRefresh for Counter {
        fn refresh(&mut self, progress: f32) {
            self.0.push(progress);
        }
    }

    fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut b = tag.to_vec();
        b.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        b.extend_from_slice(payload);
        b
    }

    fn with_dispatcher<T>(bytes: Vec<u8>, variant: GameVariant, f: impl FnOnce(&mut Dispatcher) -> T) -> T {
        let mut textures = TextureStore::default();
        let mut refresh = NoRefresh;
        let cursor = ByteCursor::from_bytes(bytes, ByteOrder::Little);
        let mut d = Dispatcher::new(cursor, variant, Palette::for_variant(variant), &mut textures, &mut refresh);
        f(&mut d)
    }

    #[test]
    fn resync_skips_exactly_the_garbage() {
        for garbage in [&[0u8][..], &[0, 1, 2], &[0x7F, b'a', b'z', 0xFF, 0x10]] {
            let mut bytes = garbage.to_vec();
            bytes.extend_from_slice(b"ENDF");
            with_dispatcher(bytes, GameVariant::Yoda, |d| {
                assert!(matches!(d.step().unwrap(), DispatchState::Dispatching { tag_start: 0, .. }));
                assert_eq!(d.step().unwrap(), DispatchState::Scanning);
                assert_eq!(d.position(), garbage.len() as u64);
                assert_eq!(d.tables.stats.skipped_bytes, garbage.len() as u64);
                assert_eq!(d.step().unwrap(), DispatchState::Dispatching { tag_start: garbage.len() as u64, tag: *b"ENDF" });
                assert_eq!(d.step().unwrap(), DispatchState::Done);
            });
        }
    }

    #[test]
    fn resync_stops_at_any_uppercase() {
        let mut bytes = vec![0, 0, b'Q', 0, 0, 0, 0];
        bytes.extend_from_slice(b"ENDF");
        with_dispatcher(bytes, GameVariant::Yoda, |d| {
            d.step().unwrap();
            d.step().unwrap();
            assert_eq!(d.position(), 2);
            d.step().unwrap();
            d.step().unwrap();
            assert_eq!(d.position(), 7);
            assert_eq!(d.tables.stats.resyncs, 2);
        });
    }

    #[test]
    fn resync_off_the_end_is_done() {
        with_dispatcher(vec![1, 2, 3, 4, 5, 6], GameVariant::Indy, |d| {
            d.step().unwrap();
            assert_eq!(d.step().unwrap(), DispatchState::Done);
            assert_eq!(d.progress(), 1.0);
        });
    }

    #[test]
    fn handler_failure_is_fatal() {
        // TILE declares one tile but the archive stops inside it
        let mut bytes = b"TILE".to_vec();
        bytes.extend_from_slice(&(TILE_CELL_SIZE as u32).to_le_bytes());
        bytes.extend_from_slice(&[0; 100]);
        with_dispatcher(bytes, GameVariant::Yoda, |d| {
            d.step().unwrap();
            assert!(d.step().unwrap_err().is_out_of_bounds());
            assert_eq!(d.state(), DispatchState::Failed);
        });
    }

    #[test]
    fn short_izon_stalls() {
        let mut bytes = b"ZONE".to_vec();
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&[0; 6]);
        bytes.extend_from_slice(b"IZON");
        bytes.extend_from_slice(&0u32.to_le_bytes());

        let result = with_dispatcher(bytes, GameVariant::Yoda, |d| {
            loop {
                match d.step() {
                    Ok(DispatchState::Done) => return Ok(()),
                    Ok(_) => {}
                    Err(e) => return Err(e),
                }
            }
        });
        assert!(matches!(result, Err(Error::Stalled { tag: "IZON", offset: 12, .. })));
    }

    #[test]
    fn zone_counter_per_tag_family() {
        // Indy: ZAUX resets, IZAX records then advances, IZX2 only records
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"ZONE");
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&3u16.to_le_bytes());
        bytes.extend_from_slice(&chunk(b"ZAUX", &[]));
        let izax_a = bytes.len() as u32;
        bytes.extend_from_slice(b"IZAX");
        bytes.extend_from_slice(&8u32.to_le_bytes());
        let izax_b = bytes.len() as u32;
        bytes.extend_from_slice(b"IZAX");
        bytes.extend_from_slice(&8u32.to_le_bytes());
        bytes.extend_from_slice(&chunk(b"ZAX2", &[]));
        let izx2_a = bytes.len() as u32;
        bytes.extend_from_slice(b"IZX2");
        bytes.extend_from_slice(&8u32.to_le_bytes());
        let izx2_b = bytes.len() as u32;
        bytes.extend_from_slice(b"IZX2");
        bytes.extend_from_slice(&8u32.to_le_bytes());
        bytes.extend_from_slice(b"ENDF");

        let mut textures = TextureStore::default();
        let mut refresh = NoRefresh;
        let cursor = ByteCursor::from_bytes(bytes, ByteOrder::Little);
        let tables = Dispatcher::new(cursor, GameVariant::Indy, Palette::indy(), &mut textures, &mut refresh)
            .run()
            .unwrap();

        assert_eq!(tables.zone(0).unwrap().izax_offset, Some(izax_a));
        assert_eq!(tables.zone(1).unwrap().izax_offset, Some(izax_b));
        assert_eq!(tables.zone(2).unwrap().izax_offset, None);
        // IZX2 never advances, the second one overwrites zone 1
        assert_eq!(tables.zone(0).unwrap().izx2_offset, Some(izx2_b));
        assert_ne!(izx2_a, izx2_b);
        assert_eq!(tables.zone(1).unwrap().izx2_offset, None);
    }

    #[test]
    fn hotspots_leave_counter_on_last_id() {
        let mut bytes = chunk(b"ACTN", &[]);
        bytes.extend_from_slice(b"HTSP");
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&4u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&SENTINEL_ID.to_le_bytes());
        bytes.extend_from_slice(b"ENDF");

        with_dispatcher(bytes, GameVariant::Yoda, |d| {
            assert_eq!(d.zone_cursor().counter(), 0);
            d.step().unwrap();
            d.step().unwrap();
            assert_eq!(d.zone_cursor().counter(), 1);
            d.step().unwrap();
            d.step().unwrap();
            assert_eq!(d.zone_cursor().counter(), 5);
            assert_eq!(d.position(), 22);
            // no zones were declared
            assert_eq!(d.tables.stats.dangling_references, 1);
        });
    }

    #[test]
    fn fixed_and_declared_chunk_ends() {
        let mut bytes = b"ZONE".to_vec();
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&[0; 6]);
        // ZAX3 length is advisory
        bytes.extend_from_slice(b"ZAX3");
        bytes.extend_from_slice(&99u32.to_le_bytes());
        bytes.extend_from_slice(b"IZX3");
        bytes.extend_from_slice(&14u32.to_le_bytes());
        bytes.extend_from_slice(&[0; 6]);
        bytes.extend_from_slice(b"ZAX4");
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(b"IZX4");
        bytes.extend_from_slice(&6u32.to_le_bytes());
        bytes.extend_from_slice(&[0; 8]);
        bytes.extend_from_slice(b"ANAM");
        bytes.extend_from_slice(b"PNAM");
        bytes.extend_from_slice(b"ENDF");

        with_dispatcher(bytes, GameVariant::Yoda, |d| {
            assert_eq!(step_tag(d), 12);    // ZONE
            assert_eq!(step_tag(d), 20);    // ZAX3, +8
            assert_eq!(step_tag(d), 34);    // IZX3, +len
            assert_eq!(step_tag(d), 42);    // ZAX4, +8
            assert_eq!(step_tag(d), 58);    // IZX4, +len+10
            assert_eq!(step_tag(d), 62);    // ANAM, +4
            assert_eq!(step_tag(d), 66);    // PNAM, +4
            d.step().unwrap();
            assert_eq!(d.step().unwrap(), DispatchState::Done);

            let zone = d.tables.zones.get(0).unwrap();
            assert_eq!(zone.izx3_offset, Some(20));
            assert_eq!(zone.izx4_offset, Some(42));
            assert_eq!(d.tables.stats.resyncs, 0);
        });
    }

    #[test]
    fn tiles_past_the_slot_range_are_not_submitted() {
        let count = TILE_TEXTURE_SLOTS as u64 + 2;
        let len = count * TILE_CELL_SIZE;
        let mut bytes = b"TILE".to_vec();
        bytes.extend_from_slice(&(len as u32).to_le_bytes());
        bytes.resize(bytes.len() + len as usize, 1);
        bytes.extend_from_slice(b"ENDF");

        let mut textures = SlotCounter::default();
        let mut refresh = NoRefresh;
        let cursor = ByteCursor::from_bytes(bytes, ByteOrder::Little);
        let mut d = Dispatcher::new(cursor, GameVariant::Yoda, Palette::yoda(), &mut textures, &mut refresh);
        assert_eq!(step_tag(&mut d), len + 8);
        assert_eq!(d.tables.tiles.len(), count as usize);
        assert_eq!(d.tables.stats.untextured_tiles, 2);
        drop(d);

        assert_eq!(textures.submitted, TILE_TEXTURE_SLOTS);
        assert_eq!(textures.highest, Some(TILE_TEXTURE_SLOTS - 1));
    }

    #[test]
    fn index_before_zone_is_dangling() {
        let mut bytes = b"IZX3".to_vec();
        bytes.extend_from_slice(&8u32.to_le_bytes());
        bytes.extend_from_slice(b"ENDF");
        with_dispatcher(bytes, GameVariant::Yoda, |d| {
            while d.step().unwrap() != DispatchState::Done {}
            assert_eq!(d.tables.stats.dangling_references, 1);
            assert_eq!(d.tables.zones.len(), 0);
        });
    }

    #[test]
    fn refresh_milestones() {
        // twenty VERS chunks, the screen is refreshed whenever 10% went by
        let mut bytes = Vec::new();
        for _ in 0..20 {
            bytes.extend_from_slice(b"VERS");
            bytes.extend_from_slice(&4u32.to_le_bytes());
        }
        bytes.extend_from_slice(b"ENDF");

        let mut textures = TextureStore::default();
        let mut refresh = Counter(Vec::new());
        let cursor = ByteCursor::from_bytes(bytes, ByteOrder::Little);
        Dispatcher::new(cursor, GameVariant::Yoda, Palette::yoda(), &mut textures, &mut refresh).run().unwrap();

        assert_eq!(refresh.0.len(), 6, "{:?}", refresh.0);
        assert!(refresh.0.windows(2).all(|w| w[1] - w[0] > REFRESH_STEP));
    }
}
