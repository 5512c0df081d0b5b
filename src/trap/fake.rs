//! Recording trap handler for unit tests

use super::{Services, Trap, TrapHandler, TrapReply, TrapVector};

pub(crate) struct FakePeer {
    pub services: Services,
    pub input: Vec<u8>,
    pub output: Vec<u8>,
    pub vectors: Vec<TrapVector>,
    pub unlocks: usize,
    pub grant_a: bool,
    pub grant_b: bool,
    pub overreport_reads: bool,
}

impl FakePeer {
    pub fn new() -> Self {
        Self::with_services(Services::all())
    }

    pub fn with_services(services: Services) -> Self {
        Self {
            services,
            input: Vec::new(),
            output: Vec::new(),
            vectors: Vec::new(),
            unlocks: 0,
            grant_a: false,
            grant_b: false,
            overreport_reads: false,
        }
    }

    pub fn with_input(input: &[u8]) -> Self {
        let mut peer = Self::new();
        peer.input = input.to_vec();
        peer
    }
}

impl TrapHandler for FakePeer {
    fn services(&self) -> Services {
        self.services
    }

    fn handle(&mut self, trap: Trap<'_>) -> TrapReply {
        self.vectors.push(trap.vector());
        match trap {
            Trap::WriteChar(c) => {
                self.output.push(c);
                TrapReply::Done
            }
            Trap::ReadLine { buf } => {
                let n = self.input.len().min(buf.len());
                buf[..n].copy_from_slice(&self.input[..n]);
                if self.overreport_reads {
                    TrapReply::Read(self.input.len())
                } else {
                    TrapReply::Read(n)
                }
            }
            Trap::CheckVariantA { flag, .. } => {
                if self.grant_a {
                    flag.grant();
                }
                TrapReply::Done
            }
            Trap::CheckVariantB { flag, .. } => {
                if self.grant_b {
                    flag.grant();
                }
                TrapReply::Done
            }
            Trap::Unlock => {
                self.unlocks += 1;
                TrapReply::Done
            }
        }
    }
}
