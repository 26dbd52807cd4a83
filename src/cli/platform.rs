//! Terminal rendering of ball effects

use magic8::effects::CLIPBOARD_ACK;
use magic8::{Celebration, Platform, SoundClip};

/// Prints effects as short text markers.
///
/// A terminal can't vibrate or open a share sheet, so haptics are skipped
/// and sharing falls back to printing the text as the "clipboard".
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalPlatform;

impl Platform for TerminalPlatform {
    fn play_clip(&self, clip: SoundClip) {
        match clip {
            SoundClip::Shake => println!("  *shake shake shake*"),
            SoundClip::Reveal => println!("  *ding*"),
        }
    }

    fn burst(&self, celebration: Celebration) {
        let width = (celebration.particle_count() / 10) as usize;
        println!("  {}", "*".repeat(width));
    }

    fn copy_to_clipboard(&self, text: &str) -> bool {
        println!("{}", text);
        true
    }

    fn notify(&self, message: &str) {
        if message == CLIPBOARD_ACK {
            println!("(copy the text above to share it)");
        } else {
            println!("{}", message);
        }
    }
}
