use std::hint::black_box;

use criterion::{BatchSize, Criterion};
use rand::RngCore;

use cloudlink::network::error::Error;
use cloudlink::network::tls::TlsContext;
use cloudlink::network::{
    Close, ConfigureTimeout, ConfigureTls, Connect, Connection, Read, SecureConnection, Write,
};
use cloudlink::transport::error::TransportError;
use cloudlink::transport::https::{HttpsConnection, Method};

struct LoopConnection {
    incoming: Vec<u8>,
    pos: usize,
}

impl LoopConnection {
    fn with_response(response: &[u8]) -> Self {
        Self {
            incoming: response.to_vec(),
            pos: 0,
        }
    }
}

impl Read for LoopConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.pos >= self.incoming.len() {
            return Ok(0);
        }
        let len = buf.len().min(self.incoming.len() - self.pos);
        buf[..len].copy_from_slice(&self.incoming[self.pos..self.pos + len]);
        self.pos += len;
        Ok(len)
    }
}

impl Write for LoopConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        black_box(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for LoopConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl ConfigureTls for LoopConnection {
    type Error = Error;

    fn install_tls(&mut self, _context: &TlsContext<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl ConfigureTimeout for LoopConnection {
    fn set_read_timeout(&mut self, _millis: u32) {}
}

impl Connection for LoopConnection {}
impl SecureConnection for LoopConnection {}

struct LoopConnector(Option<LoopConnection>);

impl Connect for LoopConnector {
    type Connection = LoopConnection;
    type Error = Error;

    fn connect(&mut self, _remote: &str) -> Result<Self::Connection, Self::Error> {
        self.0.take().ok_or(Error::NotOpen)
    }
}

pub fn bench_connect_round_trip(c: &mut Criterion) {
    let mut body = [0u8; 512];
    rand::thread_rng().fill_bytes(&mut body);

    c.bench_function("https_connect_round_trip", |b| {
        b.iter_batched(
            || {
                let connection = LoopConnection::with_response(
                    b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n",
                );
                let mut connector = LoopConnector(Some(connection));
                let mut request = HttpsConnection::open(
                    &mut connector,
                    "https://bench.example.com/telemetry",
                    Method::Post,
                )
                .expect("open failed");
                request
                    .set_header("Content-Type", "application/octet-stream")
                    .expect("header failed");
                request.write_body(&body).expect("body staging failed");
                request
            },
            |mut request| request.connect().expect("connect failed"),
            BatchSize::SmallInput,
        )
    });
}

pub fn bench_classify_peer_condition(c: &mut Criterion) {
    const CONDITIONS: &[&str] = &[
        "amqp:connection:framing-error",
        "amqp:internal-error",
        "amqp:not-found",
        "amqp:unknown-condition",
    ];

    c.bench_function("classify_peer_condition", |b| {
        b.iter(|| {
            for condition in CONDITIONS {
                black_box(TransportError::from_peer_condition(black_box(condition)));
            }
        })
    });
}
