//! Turning engine replies into results.
//!
//! There is one decoder per supported record type. Each of them asks the
//! engine’s [`Answer`] to parse the reply and converts what it gets into
//! the records of a [`QueryResult`]. If the engine fails to parse the
//! reply, its status is returned. If the records cannot be stored, the
//! result is [`Status::ENOMEM`] and nothing decoded so far is kept.
//!
//! The decoders for host and address info lookups live here, too, even if
//! there is no parse step involved for those.

use crate::addr::AddrFamily;
use crate::engine::{AddrInfo, AddrTtl, Answer, HostEnt, TxtChunk};
use crate::iana::{Rtype, Status};
use crate::result::{
    AddrInfoCname, AddrInfoNode, AddrInfoResult, AddrRecord, CnameRecord,
    HostResult, MxRecord, NaptrRecord, NsRecord, PtrRecord, QueryResult,
    SoaRecord, SrvRecord, TxtRecord,
};
use bytes::Bytes;
use std::net::IpAddr;
use tracing::warn;

/// The number of addresses an A or AAAA answer is decoded into.
///
/// Addresses beyond this are dropped.
pub const ADDRTTL_CAPACITY: usize = 256;

//------------ decode_answer -------------------------------------------------

/// Decodes an answer for the given record type.
///
/// Returns [`Status::ENOTIMP`] for record types there is no decoder for.
/// The channel never submits queries for those.
pub fn decode_answer(
    rtype: Rtype,
    answer: &dyn Answer,
) -> Result<QueryResult, Status> {
    match rtype {
        Rtype::A => decode_a(answer).map(QueryResult::A),
        Rtype::AAAA => decode_aaaa(answer).map(QueryResult::Aaaa),
        Rtype::CNAME => decode_cname(answer).map(QueryResult::Cname),
        Rtype::MX => decode_mx(answer).map(QueryResult::Mx),
        Rtype::NS => decode_ns(answer).map(QueryResult::Ns),
        Rtype::PTR => decode_ptr(answer).map(QueryResult::Ptr),
        Rtype::SOA => decode_soa(answer).map(QueryResult::Soa),
        Rtype::SRV => decode_srv(answer).map(QueryResult::Srv),
        Rtype::TXT => decode_txt(answer).map(QueryResult::Txt),
        Rtype::NAPTR => decode_naptr(answer).map(QueryResult::Naptr),
        _ => Err(Status::ENOTIMP),
    }
}

//------------ Record decoders -----------------------------------------------

pub fn decode_a(answer: &dyn Answer) -> Result<Vec<AddrRecord>, Status> {
    let mut buf = [AddrTtl::EMPTY_V4; ADDRTTL_CAPACITY];
    let count = answer.parse_a(&mut buf)?;
    addr_records(&buf[..count.min(ADDRTTL_CAPACITY)], Rtype::A)
}

pub fn decode_aaaa(answer: &dyn Answer) -> Result<Vec<AddrRecord>, Status> {
    let mut buf = [AddrTtl::EMPTY_V6; ADDRTTL_CAPACITY];
    let count = answer.parse_aaaa(&mut buf)?;
    addr_records(&buf[..count.min(ADDRTTL_CAPACITY)], Rtype::AAAA)
}

fn addr_records<A>(
    buf: &[AddrTtl<A>],
    rtype: Rtype,
) -> Result<Vec<AddrRecord>, Status>
where
    A: Copy + Into<IpAddr>,
{
    if buf.len() == ADDRTTL_CAPACITY {
        warn!(
            "{} answer filled all {} address slots, further records dropped",
            rtype, ADDRTTL_CAPACITY
        );
    }
    let mut res = with_capacity(buf.len())?;
    res.extend(buf.iter().map(|item| AddrRecord {
        host: item.addr.into(),
        ttl: Some(item.ttl),
    }));
    Ok(res)
}

pub fn decode_cname(answer: &dyn Answer) -> Result<CnameRecord, Status> {
    let host = answer.parse_cname()?;
    Ok(CnameRecord {
        cname: host.name,
        ttl: None,
    })
}

pub fn decode_mx(answer: &dyn Answer) -> Result<Vec<MxRecord>, Status> {
    let replies = answer.parse_mx()?;
    let mut res = with_capacity(replies.len())?;
    res.extend(replies.into_iter().map(|mx| MxRecord {
        host: mx.host,
        priority: mx.priority,
        ttl: Some(mx.ttl),
    }));
    Ok(res)
}

pub fn decode_ns(answer: &dyn Answer) -> Result<Vec<NsRecord>, Status> {
    let host = answer.parse_ns()?;
    let mut res = with_capacity(host.aliases.len())?;
    res.extend(
        host.aliases
            .into_iter()
            .map(|host| NsRecord { host, ttl: None }),
    );
    Ok(res)
}

pub fn decode_ptr(answer: &dyn Answer) -> Result<PtrRecord, Status> {
    let host = answer.parse_ptr()?;
    Ok(PtrRecord {
        name: host.name,
        aliases: host.aliases,
        ttl: None,
    })
}

pub fn decode_soa(answer: &dyn Answer) -> Result<SoaRecord, Status> {
    let soa = answer.parse_soa()?;
    Ok(SoaRecord {
        nsname: soa.nsname,
        hostmaster: soa.hostmaster,
        serial: soa.serial.into(),
        refresh: soa.refresh.into(),
        retry: soa.retry.into(),
        expires: soa.expire.into(),
        minttl: soa.minttl.into(),
        ttl: Some(soa.ttl),
    })
}

pub fn decode_srv(answer: &dyn Answer) -> Result<Vec<SrvRecord>, Status> {
    let replies = answer.parse_srv()?;
    let mut res = with_capacity(replies.len())?;
    res.extend(replies.into_iter().map(|srv| SrvRecord {
        host: srv.host,
        port: srv.port,
        priority: srv.priority,
        weight: srv.weight,
        ttl: Some(srv.ttl),
    }));
    Ok(res)
}

pub fn decode_txt(answer: &dyn Answer) -> Result<Vec<TxtRecord>, Status> {
    reassemble_txt(answer.parse_txt()?)
}

/// Joins TXT character strings into one record per record start.
///
/// Strings appearing before the first record start do not belong to any
/// record and are skipped.
pub fn reassemble_txt(chunks: Vec<TxtChunk>) -> Result<Vec<TxtRecord>, Status> {
    let starts = chunks.iter().filter(|chunk| chunk.record_start).count();
    let mut res = with_capacity(starts)?;
    let mut current: Option<(Vec<u8>, u32)> = None;
    for chunk in chunks {
        if chunk.record_start {
            if let Some((text, ttl)) = current.take() {
                res.push(txt_record(text, ttl));
            }
            current = Some((Vec::new(), chunk.ttl));
        }
        if let Some((ref mut text, _)) = current {
            text.try_reserve(chunk.txt.len())
                .map_err(|_| Status::ENOMEM)?;
            text.extend_from_slice(&chunk.txt);
        }
    }
    if let Some((text, ttl)) = current {
        res.push(txt_record(text, ttl));
    }
    Ok(res)
}

fn txt_record(text: Vec<u8>, ttl: u32) -> TxtRecord {
    TxtRecord {
        text: String::from_utf8_lossy(&text).into_owned(),
        ttl: Some(ttl),
    }
}

pub fn decode_naptr(answer: &dyn Answer) -> Result<Vec<NaptrRecord>, Status> {
    let replies = answer.parse_naptr()?;
    let mut res = with_capacity(replies.len())?;
    res.extend(replies.into_iter().map(|naptr| NaptrRecord {
        order: naptr.order,
        preference: naptr.preference,
        flags: lossy(&naptr.flags),
        service: lossy(&naptr.service),
        regexp: lossy(&naptr.regexp),
        replacement: naptr.replacement,
        ttl: Some(naptr.ttl),
    }));
    Ok(res)
}

fn lossy(bytes: &Bytes) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

//------------ Lookup decoders -----------------------------------------------

/// Converts a host entry into a host result.
pub fn decode_host(host: HostEnt) -> HostResult {
    let HostEnt {
        name,
        aliases,
        addrs,
    } = host;
    let aliases = aliases.into_iter().filter(|alias| *alias != name).collect();
    HostResult {
        name,
        aliases,
        addresses: addrs,
    }
}

/// Converts an address info into an address info result.
pub fn decode_addr_info(info: AddrInfo) -> AddrInfoResult {
    AddrInfoResult {
        cnames: info
            .cnames
            .into_iter()
            .map(|cname| AddrInfoCname {
                ttl: Some(cname.ttl),
                alias: cname.alias,
                name: cname.name,
            })
            .collect(),
        nodes: info
            .nodes
            .into_iter()
            .map(|node| AddrInfoNode {
                ttl: Some(node.ttl),
                flags: node.flags,
                family: AddrFamily::of(node.addr.ip()),
                socktype: node.socktype,
                protocol: node.protocol,
                addr: node.addr,
            })
            .collect(),
    }
}

//------------ Helpers -------------------------------------------------------

fn with_capacity<T>(len: usize) -> Result<Vec<T>, Status> {
    let mut res = Vec::new();
    res.try_reserve_exact(len).map_err(|_| Status::ENOMEM)?;
    Ok(res)
}

//============ Tests =========================================================
