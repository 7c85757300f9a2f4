//! Built-in TLD to RDAP endpoint table.
//!
//! Endpoints are base URLs ending in `/domain/`; the domain name is appended
//! to form the query URL. TLDs missing here have no RDAP route unless a
//! config file adds one, and fall through to WHOIS.

use std::collections::HashMap;

/// Known RDAP endpoints keyed by lowercase TLD.
pub fn get_rdap_registry_map() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        // Verisign
        ("com", "https://rdap.verisign.com/com/v1/domain/"),
        ("net", "https://rdap.verisign.com/net/v1/domain/"),
        ("cc", "https://tld-rdap.verisign.com/cc/v1/domain/"),
        ("tv", "https://rdap.nic.tv/domain/"),
        ("org", "https://rdap.publicinterestregistry.org/rdap/domain/"),
        ("biz", "https://rdap.nic.biz/domain/"),
        // Google registry
        ("app", "https://pubapi.registry.google/rdap/domain/"),
        ("dev", "https://pubapi.registry.google/rdap/domain/"),
        ("page", "https://pubapi.registry.google/rdap/domain/"),
        // CentralNic
        ("xyz", "https://rdap.centralnic.com/xyz/domain/"),
        ("tech", "https://rdap.centralnic.com/tech/domain/"),
        ("online", "https://rdap.centralnic.com/online/domain/"),
        ("site", "https://rdap.centralnic.com/site/domain/"),
        ("website", "https://rdap.centralnic.com/website/domain/"),
        ("blog", "https://rdap.blog.fury.ca/rdap/domain/"),
        ("shop", "https://rdap.gmoregistry.net/rdap/domain/"),
        ("cloud", "https://rdap.registry.cloud/rdap/domain/"),
        // Identity Digital
        ("info", "https://rdap.identitydigital.services/rdap/domain/"),
        ("io", "https://rdap.identitydigital.services/rdap/domain/"),
        ("ai", "https://rdap.identitydigital.services/rdap/domain/"),
        ("me", "https://rdap.identitydigital.services/rdap/domain/"),
        ("zone", "https://rdap.identitydigital.services/rdap/domain/"),
        ("digital", "https://rdap.identitydigital.services/rdap/domain/"),
        // Country codes
        ("us", "https://rdap.nic.us/domain/"),
        ("uk", "https://rdap.nominet.uk/domain/"),
        ("de", "https://rdap.denic.de/domain/"),
        ("ca", "https://rdap.ca.fury.ca/rdap/domain/"),
        ("au", "https://rdap.cctld.au/rdap/domain/"),
        ("fr", "https://rdap.nic.fr/domain/"),
        ("nl", "https://rdap.sidn.nl/domain/"),
        ("br", "https://rdap.registro.br/domain/"),
        ("in", "https://rdap.nixiregistry.in/rdap/domain/"),
    ])
}
