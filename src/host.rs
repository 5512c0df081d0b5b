//! Host Trusted Peer
//!
//! Services every trap for the host binary: the console is stdin/stdout,
//! the HSM is a configured password, and the actuator is a line on stderr.
//!
//! # Security Considerations
//! - Input bytes are delivered raw, embedded NULs included
//! - The HSM compares the NUL-terminated password, like a C string
//! - With no HSM password configured every delegated check is refused

use std::io::{self, BufRead, Read, Write};

use log::{debug, info, warn};

use lockgate::trap::{Services, Trap, TrapHandler, TrapReply, TrapVector, ValidationFlag};

/// Console-backed stand-in for the trusted side
pub struct HostPeer<R, W> {
    input: R,
    output: W,
    hsm_secret: Option<Vec<u8>>,
    unlocks: usize,
}

impl<R: BufRead, W: Write> HostPeer<R, W> {
    pub fn new(input: R, output: W, hsm_secret: Option<String>) -> Self {
        if hsm_secret.is_none() {
            debug!("[HOST] no HSM password configured, delegated checks will refuse");
        }
        Self {
            input,
            output,
            hsm_secret: hsm_secret.map(String::into_bytes),
            unlocks: 0,
        }
    }

    pub fn unlocks(&self) -> usize {
        self.unlocks
    }

    fn write_char(&mut self, c: u8) {
        let result = self.output.write_all(&[c]).and_then(|()| {
            if c == b'\n' {
                self.output.flush()
            } else {
                Ok(())
            }
        });
        if let Err(e) = result {
            warn!("[HOST] write_char failed: {}", e);
        }
    }

    fn read_line(&mut self, buf: &mut [u8]) -> usize {
        if let Err(e) = self.output.flush() {
            warn!("[HOST] flush before read failed: {}", e);
        }
        // Room for the window plus a "\r\n" ending; anything longer is dropped unbuffered
        let limit = buf.len() as u64 + 2;
        let mut line = Vec::new();
        if let Err(e) = (&mut self.input).take(limit).read_until(b'\n', &mut line) {
            warn!("[HOST] read_line failed: {}", e);
            return 0;
        }
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        } else {
            match discard_line(&mut self.input) {
                Ok(0) => {}
                Ok(dropped) => debug!("[HOST] read_line dropped {} bytes past the limit", dropped),
                Err(e) => warn!("[HOST] discarding rest of line failed: {}", e),
            }
        }
        let n = line.len().min(buf.len());
        buf[..n].copy_from_slice(&line[..n]);
        if line.len() > n {
            debug!("[HOST] read_line dropped {} bytes", line.len() - n);
        }
        n
    }

    fn check(&self, vector: TrapVector, password: &[u8], flag: &mut ValidationFlag) {
        let entered = password
            .iter()
            .position(|&b| b == 0)
            .map_or(password, |end| &password[..end]);
        let granted = self
            .hsm_secret
            .as_deref()
            .is_some_and(|secret| secret == entered);
        debug!("[HOST] HSM 0x{:02x}: granted={}", vector as u8, granted);
        if granted {
            flag.grant();
        }
    }

    fn unlock(&mut self) {
        self.unlocks += 1;
        info!("[HOST] actuator fired");
        eprintln!("[door] unlocked");
    }
}

/// Skip input up to and including the next newline, one buffer at a time
fn discard_line<R: BufRead>(input: &mut R) -> io::Result<usize> {
    let mut dropped = 0;
    loop {
        let available = input.fill_buf()?;
        if available.is_empty() {
            return Ok(dropped);
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(end) => {
                input.consume(end + 1);
                return Ok(dropped + end);
            }
            None => {
                let len = available.len();
                input.consume(len);
                dropped += len;
            }
        }
    }
}

impl<R: BufRead, W: Write> TrapHandler for HostPeer<R, W> {
    fn services(&self) -> Services {
        Services::all()
    }

    fn handle(&mut self, trap: Trap<'_>) -> TrapReply {
        let vector = trap.vector();
        match trap {
            Trap::WriteChar(c) => {
                self.write_char(c);
                TrapReply::Done
            }
            Trap::ReadLine { buf } => TrapReply::Read(self.read_line(buf)),
            Trap::CheckVariantA { password, flag } | Trap::CheckVariantB { password, flag } => {
                self.check(vector, password, flag);
                TrapReply::Done
            }
            Trap::Unlock => {
                self.unlock();
                TrapReply::Done
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockgate::syscall::{self, PasswordBuffer};
    use lockgate::validator::{DelegatedA, PasswordValidator, Verdict};
    use lockgate::TrapDispatcher;

    fn peer<'a>(input: &'a [u8], hsm: Option<&str>) -> HostPeer<&'a [u8], Vec<u8>> {
        HostPeer::new(input, Vec::new(), hsm.map(str::to_owned))
    }

    #[test]
    fn test_read_strips_line_ending() {
        let mut dispatcher = TrapDispatcher::new(peer(b"secret\r\nnext\n", None));
        let mut buf = PasswordBuffer::new(20).unwrap();
        assert_eq!(syscall::read_line(&mut dispatcher, &mut buf, 20), Ok(6));
        assert_eq!(&buf.as_bytes()[..7], b"secret\0");
    }

    #[test]
    fn test_read_keeps_nul() {
        let mut dispatcher = TrapDispatcher::new(peer(&[0x61, 0, 0, 0x94, b'\n'], None));
        let mut buf = PasswordBuffer::new(20).unwrap();
        assert_eq!(syscall::read_line(&mut dispatcher, &mut buf, 20), Ok(4));
    }

    #[test]
    fn test_overlong_line_is_dropped_up_to_newline() {
        let mut input = vec![b'x'; 1 << 20];
        input.extend_from_slice(b"\nnext\n");
        let mut dispatcher = TrapDispatcher::new(peer(&input, None));
        let mut buf = PasswordBuffer::new(20).unwrap();

        assert_eq!(syscall::read_line(&mut dispatcher, &mut buf, 20), Ok(20));
        assert_eq!(buf.as_bytes(), &[b'x'; 20]);

        assert_eq!(syscall::read_line(&mut dispatcher, &mut buf, 20), Ok(4));
        assert_eq!(&buf.as_bytes()[..5], b"next\0");
    }

    #[test]
    fn test_read_takes_at_most_window_plus_crlf() {
        let input = b"0123456789abcdef\r\nrest\n";
        let mut host = peer(input, None);
        let mut buf = [0u8; 16];

        assert_eq!(host.read_line(&mut buf), 16);
        assert_eq!(&buf, b"0123456789abcdef");
        assert_eq!(host.input, b"rest\n");
    }

    #[test]
    fn test_discard_line_stops_after_newline() {
        let mut input: &[u8] = b"tail of a long line\nkept\n";
        assert_eq!(discard_line(&mut input).unwrap(), 19);
        assert_eq!(input, b"kept\n");
    }

    #[test]
    fn test_read_at_eof() {
        let mut dispatcher = TrapDispatcher::new(peer(b"", None));
        let mut buf = PasswordBuffer::new(20).unwrap();
        assert_eq!(syscall::read_line(&mut dispatcher, &mut buf, 20), Ok(0));
    }

    #[test]
    fn test_hsm_compares_c_string() {
        let mut dispatcher = TrapDispatcher::new(peer(b"", Some("letmein")));
        assert_eq!(
            DelegatedA.check(&mut dispatcher, b"letmein\0garbage"),
            Ok(Verdict::Granted)
        );
        assert_eq!(DelegatedA.check(&mut dispatcher, b"letme\0"), Ok(Verdict::Denied));
    }

    #[test]
    fn test_hsm_unconfigured_refuses() {
        let mut dispatcher = TrapDispatcher::new(peer(b"", None));
        assert_eq!(DelegatedA.check(&mut dispatcher, b"\0"), Ok(Verdict::Denied));
    }

    #[test]
    fn test_write_and_unlock() {
        let mut dispatcher = TrapDispatcher::new(peer(b"", None));
        syscall::write_char(&mut dispatcher, b'k').unwrap();
        syscall::unlock(&mut dispatcher).unwrap();
        let peer = dispatcher.into_handler();
        assert_eq!(peer.output, b"k");
        assert_eq!(peer.unlocks(), 1);
    }
}
