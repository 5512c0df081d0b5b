#![allow(dead_code)]

use std::collections::VecDeque;

use lockgate::trap::{Services, Trap, TrapHandler, TrapReply, TrapVector};

type Script = Box<dyn FnMut(&[u8]) -> bool>;

/// Trusted peer whose console input and HSM verdicts are scripted by the test
pub struct ScriptedPeer {
    pub services: Services,
    pub lines: VecDeque<Vec<u8>>,
    pub output: Vec<u8>,
    pub vectors: Vec<TrapVector>,
    pub checked: Vec<(TrapVector, Vec<u8>)>,
    pub unlocks: usize,
    verdict_a: Script,
    verdict_b: Script,
}

impl ScriptedPeer {
    pub fn new() -> Self {
        Self {
            services: Services::all(),
            lines: VecDeque::new(),
            output: Vec::new(),
            vectors: Vec::new(),
            checked: Vec::new(),
            unlocks: 0,
            verdict_a: Box::new(|_| false),
            verdict_b: Box::new(|_| false),
        }
    }

    pub fn line(mut self, line: &[u8]) -> Self {
        self.lines.push_back(line.to_vec());
        self
    }

    pub fn lines(mut self, count: usize, line: &[u8]) -> Self {
        for _ in 0..count {
            self.lines.push_back(line.to_vec());
        }
        self
    }

    /// HSM grants both variants for exactly `password` (NUL-terminated)
    pub fn hsm_password(self, password: &'static [u8]) -> Self {
        self.verdict_a(move |p| c_str(p) == password)
            .verdict_b(move |p| c_str(p) == password)
    }

    pub fn verdict_a(mut self, f: impl FnMut(&[u8]) -> bool + 'static) -> Self {
        self.verdict_a = Box::new(f);
        self
    }

    pub fn verdict_b(mut self, f: impl FnMut(&[u8]) -> bool + 'static) -> Self {
        self.verdict_b = Box::new(f);
        self
    }

    pub fn services(mut self, services: Services) -> Self {
        self.services = services;
        self
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn count(&self, vector: TrapVector) -> usize {
        self.vectors.iter().filter(|v| **v == vector).count()
    }
}

impl TrapHandler for ScriptedPeer {
    fn services(&self) -> Services {
        self.services
    }

    fn handle(&mut self, trap: Trap<'_>) -> TrapReply {
        let vector = trap.vector();
        self.vectors.push(vector);
        match trap {
            Trap::WriteChar(c) => {
                self.output.push(c);
                TrapReply::Done
            }
            Trap::ReadLine { buf } => {
                let line = self.lines.pop_front().unwrap_or_default();
                let n = line.len().min(buf.len());
                buf[..n].copy_from_slice(&line[..n]);
                TrapReply::Read(n)
            }
            Trap::CheckVariantA { password, flag } => {
                self.checked.push((vector, password.to_vec()));
                if (self.verdict_a)(password) {
                    flag.grant();
                }
                TrapReply::Done
            }
            Trap::CheckVariantB { password, flag } => {
                self.checked.push((vector, password.to_vec()));
                if (self.verdict_b)(password) {
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

/// Bytes up to the first NUL
pub fn c_str(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}

/// Console transcript of one attempt reporting `status`
pub fn transcript(status: &str) -> String {
    format!("Enter the password to continue\n{}\n", status)
}
