//! A scripted resolver engine for driving channels in tests.
//!
//! The engine never touches the network. Every request is parked until the
//! mock socket is processed, at which point it is completed from the
//! replies scripted in [`Shared`]. While requests are pending, the engine
//! waits on [`MOCK_SOCKET`] for reading.
#![allow(dead_code)]

use bytes::Bytes;
use domain_channel::addr::AddrFamily;
use domain_channel::dispatch::{
    AddrInfoCompletion, HostCompletion, NameInfoCompletion, QueryCompletion,
};
use domain_channel::engine::{
    AddrInfo, AddrInfoHints, AddrInfoNode, AddrTtl, Answer, Backend, HostEnt,
    MxReply, NaptrReply, Session, SoaReply, SrvReply, TxtChunk,
};
use domain_channel::iana::{Class, Rtype, Status};
use domain_channel::options::{EngineOptions, NameInfoFlags};
use domain_channel::sock::{ActiveSockets, SockStateBridge, SocketFd};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// The socket the mock engine pretends to wait on.
pub const MOCK_SOCKET: SocketFd = 7;

/// The deadline the mock engine reports while requests are pending.
pub const MOCK_DEADLINE: Duration = Duration::from_secs(5);

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Returns a callback storing its results and where to find them.
#[allow(clippy::type_complexity)]
pub fn collect<T: Send + 'static>() -> (
    Arc<Mutex<Vec<Result<T, Status>>>>,
    impl FnOnce(Result<T, Status>) + Send + 'static,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let callback = {
        let seen = seen.clone();
        move |res| seen.lock().push(res)
    };
    (seen, callback)
}

//------------ Shared --------------------------------------------------------

/// What a scripted query returns.
#[derive(Clone)]
pub enum Reply {
    Status(Status),
    Answer(MockAnswer),
}

/// State shared between the test, the backend, and its sessions.
#[derive(Default)]
pub struct Shared {
    pub library_inits: AtomicUsize,
    pub library_cleanups: AtomicUsize,
    pub sessions_created: AtomicUsize,
    pub sessions_dropped: AtomicUsize,
    pub submissions: AtomicUsize,
    pub searches: AtomicUsize,
    pub reinits: AtomicUsize,
    pub set_servers_calls: AtomicUsize,

    pub fail_library_init: Mutex<Option<Status>>,
    pub fail_init: Mutex<Option<Status>>,
    pub fail_set_servers: Mutex<Option<Status>>,

    /// The options of the most recent session.
    pub last_options: Mutex<Option<EngineOptions>>,

    /// Local address and device settings in order.
    pub local: Mutex<Vec<String>>,

    /// Replies to queries by name.
    pub replies: Mutex<HashMap<String, Reply>>,

    /// Host entries by name or address literal.
    pub hosts: Mutex<HashMap<String, HostEnt>>,
}

impl Shared {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn reply(&self, name: &str, reply: Reply) {
        self.replies.lock().insert(name.into(), reply);
    }

    pub fn host(&self, key: &str, host: HostEnt) {
        self.hosts.lock().insert(key.into(), host);
    }
}

//------------ MockBackend ---------------------------------------------------

#[derive(Clone, Default)]
pub struct MockBackend {
    pub shared: Arc<Shared>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MockBackend {
    type Session = MockSession;

    fn library_init(&self) -> Result<(), Status> {
        if let Some(status) = *self.shared.fail_library_init.lock() {
            return Err(status);
        }
        self.shared.library_inits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn library_cleanup(&self) {
        self.shared.library_cleanups.fetch_add(1, Ordering::SeqCst);
    }

    fn init(&self, options: EngineOptions) -> Result<MockSession, Status> {
        if let Some(status) = *self.shared.fail_init.lock() {
            return Err(status);
        }
        self.shared.sessions_created.fetch_add(1, Ordering::SeqCst);
        let sock_state = options.sock_state.clone();
        *self.shared.last_options.lock() = Some(EngineOptions {
            sock_state: None,
            ..options
        });
        Ok(MockSession {
            shared: self.shared.clone(),
            sock_state,
            pending: Vec::new(),
            servers: vec![IpAddr::V4(Ipv4Addr::LOCALHOST)],
        })
    }
}

//------------ MockSession ---------------------------------------------------

enum Request {
    Query(String, QueryCompletion),
    Host(String, HostCompletion),
    NameInfo(SocketAddr, NameInfoCompletion),
    AddrInfo(String, Option<String>, AddrInfoCompletion),
}

pub struct MockSession {
    shared: Arc<Shared>,
    sock_state: Option<SockStateBridge>,
    pending: Vec<Request>,
    servers: Vec<IpAddr>,
}

impl MockSession {
    fn enqueue(&mut self, request: Request) {
        self.shared.submissions.fetch_add(1, Ordering::SeqCst);
        if self.pending.is_empty() {
            self.notify(true);
        }
        self.pending.push(request);
    }

    fn notify(&self, readable: bool) {
        if let Some(ref bridge) = self.sock_state {
            bridge.notify(MOCK_SOCKET, readable, false)
        }
    }

    fn take_pending(&mut self) -> Vec<Request> {
        let pending = std::mem::take(&mut self.pending);
        if !pending.is_empty() {
            self.notify(false);
        }
        pending
    }

    fn complete(&self, request: Request) {
        match request {
            Request::Query(name, done) => {
                let reply = self.shared.replies.lock().get(&name).cloned();
                match reply {
                    Some(Reply::Answer(answer)) => {
                        done.complete(Status::SUCCESS, Some(&answer))
                    }
                    Some(Reply::Status(status)) => done.complete(status, None),
                    None => done.complete(Status::ENOTFOUND, None),
                }
            }
            Request::Host(key, done) => {
                let host = self.shared.hosts.lock().get(&key).cloned();
                match host {
                    Some(host) => done.complete(Status::SUCCESS, Some(host)),
                    None => done.complete(Status::ENOTFOUND, None),
                }
            }
            Request::NameInfo(addr, done) => {
                let port = addr.port().to_string();
                done.complete(Status::SUCCESS, Some("localhost"), Some(&port))
            }
            Request::AddrInfo(name, service, done) => {
                let host = self.shared.hosts.lock().get(&name).cloned();
                let host = match host {
                    Some(host) => host,
                    None => return done.complete(Status::ENOTFOUND, None),
                };
                let port = service
                    .and_then(|service| service.parse().ok())
                    .unwrap_or(0);
                let nodes = host
                    .addrs
                    .iter()
                    .map(|addr| AddrInfoNode {
                        ttl: 60,
                        flags: 0,
                        socktype: libc::SOCK_STREAM,
                        protocol: libc::IPPROTO_TCP,
                        addr: SocketAddr::new(*addr, port),
                    })
                    .collect();
                done.complete(
                    Status::SUCCESS,
                    Some(AddrInfo {
                        cnames: Vec::new(),
                        nodes,
                    }),
                )
            }
        }
    }
}

impl Session for MockSession {
    fn query(
        &mut self,
        name: &str,
        _class: Class,
        _rtype: Rtype,
        done: QueryCompletion,
    ) {
        self.enqueue(Request::Query(name.into(), done))
    }

    fn search(
        &mut self,
        name: &str,
        _class: Class,
        _rtype: Rtype,
        done: QueryCompletion,
    ) {
        self.shared.searches.fetch_add(1, Ordering::SeqCst);
        self.enqueue(Request::Query(name.into(), done))
    }

    fn host_by_name(
        &mut self,
        name: &str,
        _family: AddrFamily,
        done: HostCompletion,
    ) {
        self.enqueue(Request::Host(name.into(), done))
    }

    fn host_by_addr(&mut self, addr: IpAddr, done: HostCompletion) {
        self.enqueue(Request::Host(addr.to_string(), done))
    }

    fn name_info(
        &mut self,
        addr: SocketAddr,
        _flags: NameInfoFlags,
        done: NameInfoCompletion,
    ) {
        self.enqueue(Request::NameInfo(addr, done))
    }

    fn addr_info(
        &mut self,
        name: &str,
        service: Option<&str>,
        _hints: &AddrInfoHints,
        done: AddrInfoCompletion,
    ) {
        self.enqueue(Request::AddrInfo(
            name.into(),
            service.map(Into::into),
            done,
        ))
    }

    fn cancel(&mut self) {
        for request in self.take_pending() {
            match request {
                Request::Query(_, done) => done.fail(Status::ECANCELLED),
                Request::Host(_, done) => done.fail(Status::ECANCELLED),
                Request::NameInfo(_, done) => done.fail(Status::ECANCELLED),
                Request::AddrInfo(_, _, done) => {
                    done.fail(Status::ECANCELLED)
                }
            }
        }
    }

    fn reinit(&mut self) -> Result<(), Status> {
        self.shared.reinits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn timeout(&self, max: Option<Duration>) -> Option<Duration> {
        if self.pending.is_empty() {
            return max;
        }
        Some(match max {
            Some(max) => MOCK_DEADLINE.min(max),
            None => MOCK_DEADLINE,
        })
    }

    fn active_sockets(&self) -> ActiveSockets {
        let mut res = ActiveSockets::default();
        if !self.pending.is_empty() {
            res.readable.insert(MOCK_SOCKET);
        }
        res
    }

    fn process(&mut self, read: Option<SocketFd>, _write: Option<SocketFd>) {
        if read != Some(MOCK_SOCKET) {
            return;
        }
        for request in self.take_pending() {
            self.complete(request)
        }
    }

    fn servers(&self) -> Result<Vec<IpAddr>, Status> {
        Ok(self.servers.clone())
    }

    fn set_servers(&mut self, servers: &[IpAddr]) -> Result<(), Status> {
        self.shared.set_servers_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = *self.shared.fail_set_servers.lock() {
            return Err(status);
        }
        self.servers = servers.into();
        Ok(())
    }

    fn set_local_ip4(&mut self, addr: Ipv4Addr) {
        self.shared.local.lock().push(format!("ip4 {}", addr));
    }

    fn set_local_ip6(&mut self, addr: Ipv6Addr) {
        self.shared.local.lock().push(format!("ip6 {}", addr));
    }

    fn set_local_dev(&mut self, dev: &str) {
        self.shared.local.lock().push(format!("dev {}", dev));
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.shared.sessions_dropped.fetch_add(1, Ordering::SeqCst);
    }
}

//------------ MockAnswer ----------------------------------------------------

/// A reply with canned parse results for every record type.
#[derive(Clone, Default)]
pub struct MockAnswer {
    pub a: Vec<AddrTtl<Ipv4Addr>>,
    pub aaaa: Vec<AddrTtl<Ipv6Addr>>,
    pub host: HostEnt,
    pub mx: Vec<MxReply>,
    pub soa: Option<SoaReply>,
    pub srv: Vec<SrvReply>,
    pub txt: Vec<TxtChunk>,
    pub naptr: Vec<NaptrReply>,
    pub fail: Option<Status>,
}

impl MockAnswer {
    /// Returns an answer with records for all supported types.
    pub fn full() -> Self {
        MockAnswer {
            a: vec![
                AddrTtl {
                    addr: Ipv4Addr::new(192, 0, 2, 1),
                    ttl: 300,
                },
                AddrTtl {
                    addr: Ipv4Addr::new(192, 0, 2, 2),
                    ttl: 300,
                },
            ],
            aaaa: vec![AddrTtl {
                addr: Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1),
                ttl: 300,
            }],
            host: HostEnt {
                name: "www.example.com".into(),
                aliases: vec![
                    "ns1.example.com".into(),
                    "ns2.example.com".into(),
                ],
                addrs: Vec::new(),
            },
            mx: vec![
                MxReply {
                    host: "mx1.example.com".into(),
                    priority: 10,
                    ttl: 3600,
                },
                MxReply {
                    host: "mx2.example.com".into(),
                    priority: 20,
                    ttl: 3600,
                },
            ],
            soa: Some(SoaReply {
                nsname: "ns1.example.com".into(),
                hostmaster: "hostmaster.example.com".into(),
                serial: 2024010101,
                refresh: 7200,
                retry: 3600,
                expire: 1209600,
                minttl: 300,
                ttl: 86400,
            }),
            srv: vec![SrvReply {
                host: "sip.example.com".into(),
                port: 5060,
                priority: 10,
                weight: 60,
                ttl: 600,
            }],
            txt: vec![
                TxtChunk {
                    txt: Bytes::from_static(b"a"),
                    record_start: true,
                    ttl: 10,
                },
                TxtChunk {
                    txt: Bytes::from_static(b"b"),
                    record_start: false,
                    ttl: 10,
                },
                TxtChunk {
                    txt: Bytes::from_static(b"c"),
                    record_start: true,
                    ttl: 20,
                },
            ],
            naptr: vec![NaptrReply {
                order: 100,
                preference: 10,
                flags: Bytes::from_static(b"S"),
                service: Bytes::from_static(b"SIP+D2U"),
                regexp: Bytes::new(),
                replacement: "_sip._udp.example.com".into(),
                ttl: 3600,
            }],
            fail: None,
        }
    }

    fn check(&self) -> Result<(), Status> {
        match self.fail {
            Some(status) => Err(status),
            None => Ok(()),
        }
    }
}

fn fill<A: Copy>(src: &[AddrTtl<A>], out: &mut [AddrTtl<A>]) -> usize {
    let n = src.len().min(out.len());
    out[..n].copy_from_slice(&src[..n]);
    n
}

impl Answer for MockAnswer {
    fn parse_a(&self, out: &mut [AddrTtl<Ipv4Addr>]) -> Result<usize, Status> {
        self.check()?;
        Ok(fill(&self.a, out))
    }

    fn parse_aaaa(
        &self,
        out: &mut [AddrTtl<Ipv6Addr>],
    ) -> Result<usize, Status> {
        self.check()?;
        Ok(fill(&self.aaaa, out))
    }

    fn parse_cname(&self) -> Result<HostEnt, Status> {
        self.check()?;
        Ok(self.host.clone())
    }

    fn parse_ns(&self) -> Result<HostEnt, Status> {
        self.check()?;
        Ok(self.host.clone())
    }

    fn parse_ptr(&self) -> Result<HostEnt, Status> {
        self.check()?;
        Ok(self.host.clone())
    }

    fn parse_mx(&self) -> Result<Vec<MxReply>, Status> {
        self.check()?;
        Ok(self.mx.clone())
    }

    fn parse_soa(&self) -> Result<SoaReply, Status> {
        self.check()?;
        self.soa.clone().ok_or(Status::EBADRESP)
    }

    fn parse_srv(&self) -> Result<Vec<SrvReply>, Status> {
        self.check()?;
        Ok(self.srv.clone())
    }

    fn parse_txt(&self) -> Result<Vec<TxtChunk>, Status> {
        self.check()?;
        Ok(self.txt.clone())
    }

    fn parse_naptr(&self) -> Result<Vec<NaptrReply>, Status> {
        self.check()?;
        Ok(self.naptr.clone())
    }
}
