//! # Passive Listener
//!
//! Captures frames on one interface and prints every DHCP, mDNS or LLMNR
//! sighting as a JSON line on stdout. The output can be piped straight into
//! `hostdb ingest`.
//!
//! Capture runs on its own thread; frames reach the decoding loop through a
//! channel so a slow consumer never stalls the socket reads.

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use anyhow::{Context, bail};
use pnet::datalink::{self, Channel, Config, DataLinkReceiver, NetworkInterface};
use hostdb_protocols::frame::decode_frame;
use hostdb_protocols::sighting::Sighting;
use tracing::{debug, info, warn};

const READ_TIMEOUT_MS: u64 = 50;

pub fn listen(interface_name: &str, count: Option<usize>) -> anyhow::Result<()> {
    let interface: NetworkInterface = find_interface(interface_name)?;
    let rx = open_eth_receiver(&interface, &get_config(), datalink::channel)?;
    info!("listening on {}", interface.name);

    let frames: Receiver<Vec<u8>> = spawn_capture(rx);
    let mut stdout = io::stdout().lock();
    let printed: usize = relay(frames, count, |sighting| {
        writeln!(stdout, "{}", sighting.to_json_line()?)?;
        stdout.flush()?;
        Ok(())
    })?;

    info!("{printed} sightings printed");
    Ok(())
}

fn find_interface(name: &str) -> anyhow::Result<NetworkInterface> {
    datalink::interfaces()
        .into_iter()
        .find(|intf| intf.name == name)
        .with_context(|| format!("no interface named {name}"))
}

fn get_config() -> Config {
    Config {
        read_timeout: Some(Duration::from_millis(READ_TIMEOUT_MS)),
        ..Default::default()
    }
}

fn open_eth_receiver<F>(intf: &NetworkInterface, cfg: &Config, channel_opener: F) -> anyhow::Result<Box<dyn DataLinkReceiver>>
where
    F: FnOnce(&NetworkInterface, Config) -> io::Result<Channel>,
{
    let ch: Channel = channel_opener(intf, *cfg).with_context(|| format!("opening on {}", intf.name))?;
    match ch {
        Channel::Ethernet(_tx, rx) => Ok(rx),
        _ => bail!("non-ethernet channel for {}", intf.name),
    }
}

/// Moves captured frames onto a channel. The thread ends when the receiving
/// side hangs up or the capture fails.
fn spawn_capture(mut rx: Box<dyn DataLinkReceiver>) -> Receiver<Vec<u8>> {
    let (tx, frames): (Sender<Vec<u8>>, Receiver<Vec<u8>>) = mpsc::channel();

    thread::spawn(move || {
        loop {
            match rx.next() {
                Ok(frame) => {
                    if tx.send(frame.to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
                Err(e) => {
                    warn!("capture stopped: {e}");
                    break;
                }
            }
        }
    });

    frames
}

/// Decodes frames until the channel closes or `limit` sightings were emitted.
fn relay<F>(frames: Receiver<Vec<u8>>, limit: Option<usize>, mut emit: F) -> anyhow::Result<usize>
where
    F: FnMut(&Sighting) -> anyhow::Result<()>,
{
    let mut emitted: usize = 0;
    if limit == Some(0) {
        return Ok(emitted);
    }

    for frame in frames {
        for sighting in decode_frame(&frame) {
            debug!(source = ?sighting.source, "sighting");
            emit(&sighting)?;
            emitted += 1;
            if limit.is_some_and(|limit| emitted >= limit) {
                return Ok(emitted);
            }
        }
    }

    Ok(emitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnet::datalink::dummy;
    use pnet::packet::ethernet::{EtherTypes, MutableEthernetPacket};
    use pnet::packet::ip::IpNextHeaderProtocols;
    use pnet::packet::ipv4::MutableIpv4Packet;
    use pnet::packet::udp::MutableUdpPacket;
    use pnet::util::MacAddr;
    use std::net::Ipv4Addr;

    // Minimal mDNS response: one A record for nas.local -> 10.0.0.7.
    fn mdns_payload() -> Vec<u8> {
        let mut out: Vec<u8> = vec![0, 0, 0x84, 0x00, 0, 0, 0, 1, 0, 0, 0, 0];
        out.extend_from_slice(&[3, b'n', b'a', b's', 5, b'l', b'o', b'c', b'a', b'l', 0]);
        out.extend_from_slice(&[0, 1, 0, 1, 0, 0, 0, 120, 0, 4, 10, 0, 0, 7]);
        out
    }

    fn mdns_frame() -> Vec<u8> {
        let payload = mdns_payload();
        let udp_len = 8 + payload.len();
        let ip_len = 20 + udp_len;
        let mut buffer = vec![0u8; 14 + ip_len];
        {
            let mut eth = MutableEthernetPacket::new(&mut buffer).unwrap();
            eth.set_source(MacAddr::new(0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff));
            eth.set_destination(MacAddr::new(0x01, 0x00, 0x5e, 0x00, 0x00, 0xfb));
            eth.set_ethertype(EtherTypes::Ipv4);
        }
        {
            let mut ip = MutableIpv4Packet::new(&mut buffer[14..]).unwrap();
            ip.set_version(4);
            ip.set_header_length(5);
            ip.set_total_length(ip_len as u16);
            ip.set_ttl(255);
            ip.set_next_level_protocol(IpNextHeaderProtocols::Udp);
            ip.set_source(Ipv4Addr::new(10, 0, 0, 7));
            ip.set_destination(Ipv4Addr::new(224, 0, 0, 251));
        }
        {
            let mut udp = MutableUdpPacket::new(&mut buffer[34..]).unwrap();
            udp.set_source(5353);
            udp.set_destination(5353);
            udp.set_length(udp_len as u16);
            udp.set_payload(&payload);
        }
        buffer
    }

    #[test]
    fn relay_stops_at_limit() {
        let (tx, rx) = mpsc::channel();
        for _ in 0..3 {
            tx.send(mdns_frame()).unwrap();
        }
        tx.send(vec![0u8; 10]).unwrap();
        drop(tx);

        let mut lines: Vec<String> = Vec::new();
        let emitted = relay(rx, Some(2), |s| {
            lines.push(s.to_json_line()?);
            Ok(())
        })
        .unwrap();

        assert_eq!(emitted, 2);
        assert_eq!(lines[0], r#"{"ip":"10.0.0.7","hostname":"nas","source":"mDNS A"}"#);
    }

    #[test]
    fn relay_drains_until_hangup() {
        let (tx, rx) = mpsc::channel();
        tx.send(mdns_frame()).unwrap();
        tx.send(vec![0u8; 10]).unwrap();
        drop(tx);

        let emitted = relay(rx, None, |_| Ok(())).unwrap();
        assert_eq!(emitted, 1);
    }

    #[test]
    fn open_eth_receiver_should_succeed_on_ethernet_channel() {
        let dummy_intf: NetworkInterface = dummy::dummy_interface(0);
        let opener = |i: &NetworkInterface, _cfg: Config| -> io::Result<Channel> {
            datalink::dummy::channel(i, dummy::Config::default())
        };
        assert!(open_eth_receiver(&dummy_intf, &Config::default(), opener).is_ok());
    }

    #[test]
    fn open_eth_receiver_should_fail_on_io_error() {
        let dummy_intf: NetworkInterface = dummy::dummy_interface(0);
        let opener = |_: &NetworkInterface, _: Config| -> io::Result<Channel> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "Mock I/O Error"))
        };
        let err = open_eth_receiver(&dummy_intf, &Config::default(), opener).err().unwrap();
        assert!(err.to_string().contains("opening on eth0"));
        let cause = err.downcast_ref::<io::Error>().unwrap();
        assert_eq!(cause.kind(), io::ErrorKind::PermissionDenied);
    }
}
