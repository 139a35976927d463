//! Background music rotation.
//!
//! The session does not play audio itself. It owns a [`Playlist`], tells the
//! audio collaborator which track to play, and advances when that
//! collaborator reports the end of a track.

use rand::seq::SliceRandom;
use rand::Rng;

/// Soundtrack shipped with the game.
pub const DEFAULT_TRACKS: [&str; 4] = [
    "Assets/Calm Waters.mp3",
    "Assets/Waves of Freedom.mp3",
    "Assets/Drift on the Horizon.mp3",
    "Assets/Sailing the Digital Tides.mp3",
];

/// Shuffled, endlessly repeating list of tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    tracks: Vec<String>,
    current: usize,
}

impl Playlist {
    /// Shuffles `tracks` once and starts at the first.
    pub fn shuffled<R, I, S>(tracks: I, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tracks: Vec<String> = tracks.into_iter().map(Into::into).collect();
        tracks.shuffle(rng);
        Self { tracks, current: 0 }
    }

    /// Track that should be playing, `None` for an empty playlist.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.tracks.get(self.current).map(String::as_str)
    }

    /// Moves to the next track, wrapping to the first after the last.
    pub fn advance(&mut self) -> Option<&str> {
        if self.tracks.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.tracks.len();
        self.current()
    }

    /// All tracks in play order.
    #[must_use]
    pub fn tracks(&self) -> &[String] {
        &self.tracks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn shuffle_keeps_every_track() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let playlist = Playlist::shuffled(DEFAULT_TRACKS, &mut rng);
        let mut got: Vec<&str> = playlist.tracks().iter().map(String::as_str).collect();
        let mut want = DEFAULT_TRACKS.to_vec();
        got.sort_unstable();
        want.sort_unstable();
        assert_eq!(got, want);
    }

    #[test]
    fn advance_wraps() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut playlist = Playlist::shuffled(["a", "b", "c"], &mut rng);
        let first = playlist.current().map(str::to_owned);
        playlist.advance();
        playlist.advance();
        let back = playlist.advance().map(str::to_owned);
        assert_eq!(first, back);
    }

    #[test]
    fn empty_playlist_is_silent() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut playlist = Playlist::shuffled(Vec::<String>::new(), &mut rng);
        assert_eq!(playlist.current(), None);
        assert_eq!(playlist.advance(), None);
    }
}
