//! Session integrity seed exchange.
//!
//! The seed salts every checksum computed during the session; both sides
//! must hold the same value. The server chooses it (generating one from the
//! clock when none was configured) and sends it; the client reads it. This
//! is the final wire round-trip of negotiation.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::channel::VersionChannel;
use crate::context::NegotiationContext;
use crate::error::HandshakeError;

/// Establishes the shared session seed over `channel`.
///
/// Postcondition: [`NegotiationContext::session_seed`] holds the same value
/// on both sides; it is immutable for the rest of the session.
pub fn exchange_seed<C: VersionChannel>(
    ctx: &mut NegotiationContext,
    channel: &mut C,
) -> Result<(), HandshakeError> {
    let seed = if ctx.role().is_server() {
        let seed = ctx.preset_seed.unwrap_or_else(generate_seed);
        channel.write_int(seed)?;
        seed
    } else {
        channel.read_int()?
    };

    ctx.set_session_seed(seed);
    Ok(())
}

/// Derives a seed from the wall clock, the traditional per-session salt.
fn generate_seed() -> i32 {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs());
    // A zero seed reads as "unconfigured" elsewhere; never hand one out.
    match seconds as i32 {
        0 => 1,
        value => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::IntChannel;
    use crate::context::{FeatureRequests, HandshakeConfig};
    use std::io::Cursor;

    #[test]
    fn server_generates_a_nonzero_seed_and_the_client_reads_it_back() {
        let mut server = NegotiationContext::new(
            HandshakeConfig::server(),
            FeatureRequests::default(),
        );
        let mut server_channel = IntChannel::new(Cursor::new(Vec::new()), Vec::new());
        exchange_seed(&mut server, &mut server_channel).expect("server exchange succeeds");

        let seed = server.session_seed().expect("seed is set");
        assert_ne!(seed, 0);

        let (_, wire) = server_channel.into_parts();
        let mut client = NegotiationContext::new(
            HandshakeConfig::client(),
            FeatureRequests::default(),
        );
        let mut client_channel = IntChannel::new(Cursor::new(wire), Vec::new());
        exchange_seed(&mut client, &mut client_channel).expect("client exchange succeeds");

        assert_eq!(client.session_seed(), Some(seed));
    }

    #[test]
    fn preconfigured_seed_is_transmitted_as_is() {
        let config = HandshakeConfig {
            preset_seed: Some(0x5EED),
            ..HandshakeConfig::server()
        };
        let mut server = NegotiationContext::new(config, FeatureRequests::default());
        let mut channel = IntChannel::new(Cursor::new(Vec::new()), Vec::new());
        exchange_seed(&mut server, &mut channel).expect("exchange succeeds");

        assert_eq!(server.session_seed(), Some(0x5EED));
        let (_, wire) = channel.into_parts();
        assert_eq!(wire, 0x5EEDi32.to_le_bytes());
    }

    #[test]
    fn generated_seeds_are_nonzero() {
        assert_ne!(generate_seed(), 0);
    }
}
