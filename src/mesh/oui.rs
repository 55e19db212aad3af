//! Vendor prefix table for mesh system brands
//!
//! Brands are listed in lookup order. Several vendors share OEM
//! prefixes, so the first brand carrying a prefix wins.

use crate::wifi::Bssid;

pub struct BrandEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub ouis: &'static [&'static str],
}

impl BrandEntry {
    pub fn contains(&self, oui: &str) -> bool {
        self.ouis.iter().any(|o| o.eq_ignore_ascii_case(oui))
    }
}

/// Identify the mesh brand from a set of BSSIDs
///
/// BSSIDs are tried in order; the first one whose OUI is known decides.
pub fn identify_brand<'a, I>(bssids: I) -> Option<&'static BrandEntry>
where
    I: IntoIterator<Item = &'a Bssid>,
{
    bssids.into_iter().find_map(|bssid| {
        let oui = bssid.oui();
        MESH_BRANDS.iter().find(|brand| brand.contains(&oui))
    })
}

pub static MESH_BRANDS: &[BrandEntry] = &[
    BrandEntry {
        key: "eero",
        name: "eero",
        ouis: &[
            "A0:21:B7", "68:1D:A0", "B0:8E:86", "F8:BB:BF", "D8:8E:D4", "E8:D3:EB",
            "00:AB:48", "80:DA:13", "74:B6:B6", "6C:AE:F6", "68:4A:76", "60:5F:8D",
            "50:F5:DA", "C4:93:D9", "58:D9:D5", "50:1A:C5", "04:D3:B0", "24:F5:AA",
            "9C:30:5B", "A8:81:95", "74:75:48", "60:32:B1", "84:D8:1B", "00:90:4C",
            "70:56:81", "C8:69:CD", "40:B4:CD", "BC:E6:43", "8C:85:90", "DC:A6:32",
            "88:E9:FE", "28:6C:07", "3C:22:FB", "90:72:40", "D0:04:01", "AC:BC:32",
            "34:D2:70", "B0:BE:76", "58:8B:F3", "EC:01:EE", "A4:11:6B", "70:4D:7B",
            "98:F1:70", "CC:32:E5", "40:A3:CC", "1C:69:7A", "B8:C7:5D", "2C:1F:23",
            "44:CE:7D", "D4:61:9D", "78:4F:43", "0C:47:C9", "B4:A9:FC", "88:1F:A1",
            "FC:EC:DA", "30:23:03", "24:A0:74", "6C:72:20", "E0:55:3D", "48:43:7C",
        ],
    },
    BrandEntry {
        key: "orbi_netgear",
        name: "Netgear Orbi",
        ouis: &[
            "98:97:9A", "44:B1:3B", "9C:28:EF", "A0:04:60", "04:A1:51", "10:0D:7F",
            "28:C6:8E", "B0:7F:B9", "4C:60:DE", "9C:3D:CF", "A0:40:A0", "20:E5:2A",
            "C4:04:15", "84:1B:5E", "40:16:7E", "2C:30:33", "E0:46:9A", "6C:19:8F",
            "C0:3F:0E", "08:BD:43", "74:44:01", "B0:39:56", "30:46:9A", "A0:63:91",
            "44:94:FC", "3C:37:86", "1C:C1:DE", "78:D2:94", "DC:EF:09", "08:02:8E",
            "74:98:0B", "A4:2B:B0", "50:C7:BF", "6C:B0:CE", "84:A4:23", "E0:91:F5",
            "CC:40:D0", "9C:5C:8E", "28:56:5A", "70:4F:57", "FC:94:E3", "1C:BD:B9",
            "B4:75:0E", "34:98:B5", "40:0D:10", "6C:CD:D6", "A0:21:B7", "30:87:30",
            "50:6A:03",
        ],
    },
    BrandEntry {
        key: "google_nest",
        name: "Google Nest WiFi",
        ouis: &[
            "A4:50:46", "64:FF:89", "CC:52:AF", "6C:71:0D", "F4:F5:D8", "4C:49:E3",
            "78:E1:03", "18:B4:30", "30:FD:38", "A4:DA:32", "90:72:40", "F8:8F:CA",
            "6C:AD:F8", "F0:EF:86", "40:4E:36", "E8:40:F2", "B4:CE:F6", "84:F3:EB",
            "3C:36:3D", "00:1A:11", "D8:50:E6", "B0:79:94", "C8:14:79", "54:60:09",
            "68:C6:3A", "DC:3A:5E", "48:57:02", "7C:2E:BD", "98:DE:D0", "14:2D:27",
            "B8:AD:28", "E0:CB:4E", "20:DF:B9", "A0:C5:89", "74:E5:43", "58:CB:52",
            "88:3F:D3", "C4:B3:01", "60:F1:89", "9C:B6:D0",
        ],
    },
    BrandEntry {
        key: "asus",
        name: "ASUS",
        ouis: &[
            "40:ED:00", "88:1F:A1", "AC:9E:17", "2C:56:DC", "04:D4:C4", "70:4D:7B",
            "B8:EE:65", "1C:87:2C", "50:46:5D", "D8:50:E6", "38:D5:47", "F0:2F:74",
            "30:5A:3A", "04:92:26", "00:E0:4C", "00:08:A1", "00:0E:A6", "00:11:D8",
            "00:13:D4", "00:15:F2", "00:17:31", "00:19:DB", "00:1B:FC", "00:1E:8C",
            "00:22:15", "00:23:54", "00:24:8C", "00:26:18", "08:60:6E", "10:7B:44",
            "14:DD:A9", "20:CF:30", "24:4B:FE", "28:10:7B", "30:85:A9", "34:97:F6",
            "38:2C:4A", "3C:7C:3F", "40:16:7E", "48:EE:0C", "4C:ED:FB", "50:3E:AA",
            "54:04:A6", "5C:AC:4C", "60:45:CB", "64:66:B3", "6C:F0:49", "70:8B:CD",
            "74:D0:2B", "78:24:AF", "7C:10:C9", "80:1F:02", "84:A4:23", "88:D7:F6",
            "8C:10:D4", "90:F6:52", "94:FB:A7", "98:5A:EB", "9C:5C:8E", "A0:F3:C1",
            "AC:22:0B", "B0:6E:BF", "B4:2E:99", "B8:AE:6E", "BC:EE:7B", "C8:60:00",
            "CC:2D:E0", "D0:17:C2", "D4:5D:64", "D8:47:32", "DC:FB:02", "E0:3F:49",
            "E4:70:B8", "E8:CC:18", "EC:F4:BB", "F0:79:59", "F4:6D:04", "F8:32:E4",
            "FC:34:97",
        ],
    },
    BrandEntry {
        key: "tp_link_deco",
        name: "TP-Link Deco",
        ouis: &[
            "98:25:4A", "44:94:FC", "B0:48:7A", "50:C7:BF", "A4:2B:B0", "14:CC:20",
            "1C:61:B4", "98:48:27", "18:A6:F7", "00:23:CD", "00:27:19", "04:8D:38",
            "08:55:31", "0C:80:63", "10:27:F5", "14:E6:E4", "18:D6:C7", "1C:FA:68",
            "20:F4:78", "24:05:0F", "28:2C:02", "2C:F0:5D", "30:07:4D", "34:29:8F",
            "38:71:DE", "3C:84:6A", "40:A5:EF", "44:D9:E7", "48:3B:38", "4C:E1:73",
            "50:1A:C5", "54:AF:97", "58:8E:81", "5C:62:8B", "60:E3:27", "64:70:02",
            "68:FF:7B", "6C:5A:B0", "70:4F:57", "74:DA:38", "78:81:02", "7C:8A:E1",
            "80:EA:96", "84:16:F9", "88:C3:97", "8C:53:C3", "90:F6:52", "94:E9:79",
            "98:DA:C4", "9C:A6:15", "A0:F3:C1", "A4:B1:E9", "A8:40:41", "AC:84:C6",
            "B0:4E:26", "B4:B0:24", "B8:69:F4", "BC:46:99", "C0:06:C3", "C4:6E:1F",
            "C8:0E:14", "CC:32:E5", "D0:76:E7", "D4:6E:0E", "D8:0D:17", "DC:9F:DB",
            "E0:28:6D", "E4:9A:DC", "E8:DE:27", "EC:08:6B", "F0:F2:49", "F4:28:53",
            "F8:1A:67", "FC:7C:02",
        ],
    },
    BrandEntry {
        key: "linksys_velop",
        name: "Linksys Velop",
        ouis: &[
            "6C:BE:E9", "13:10:47", "98:9E:64", "94:10:3E", "C4:41:1E", "00:0F:66",
            "00:13:10", "00:14:BF", "00:16:B6", "00:18:39", "00:1A:70", "00:1C:10",
            "00:1D:7E", "00:1E:E5", "00:21:29", "00:22:6B", "00:23:04", "00:24:13",
            "00:25:45", "00:40:96", "08:86:3B", "10:05:CA", "14:91:82", "18:1B:EB",
            "1C:DF:0F", "20:AA:4B", "24:F2:7F", "28:F0:76", "2C:AB:A4", "30:23:03",
            "34:A8:4E", "38:2A:68", "3C:1E:04", "40:B0:FA", "44:32:C8", "48:F8:B3",
            "4C:00:82", "50:3D:E5", "54:78:1A", "58:6D:8F", "5C:50:15", "60:38:E0",
            "64:1C:B0", "68:7F:74", "6C:50:4D", "70:1A:04", "74:E2:F5", "78:CA:39",
            "7C:34:79", "80:69:1A", "84:B5:17", "88:CB:87", "8C:04:BA", "90:35:5B",
            "94:44:52", "98:FC:11", "9C:97:26", "A0:55:4F", "A4:18:75", "A8:9C:ED",
            "AC:1D:DF", "B0:10:41", "B4:3A:28", "B8:55:10", "BC:67:78", "C0:56:27",
            "C4:7C:8D", "C8:D7:19", "CC:5D:4E", "D0:59:E4", "D4:CA:6D", "D8:FE:E3",
            "DC:85:DE", "E0:1C:41", "E4:F4:C6", "E8:98:6D", "EC:E1:A9", "F0:92:1C",
            "F4:EC:38", "F8:E7:1E",
        ],
    },
    BrandEntry {
        key: "ubiquiti",
        name: "Ubiquiti",
        ouis: &[
            "78:8A:20", "24:5A:4C", "F0:9F:C2", "44:D9:E7", "E0:63:DA", "04:18:D6",
            "68:72:51", "B4:FB:E4", "DC:9F:DB", "80:2A:A8", "00:15:6D", "00:27:22",
            "18:E8:29", "24:A4:3C", "6C:88:14", "74:83:C2", "68:D7:9A", "70:A7:41",
            "74:AC:B9", "78:45:58", "84:B5:9C", "88:1F:A1", "8C:59:C3", "90:9A:4A",
            "94:3E:EA", "98:FA:9B", "9C:93:4E", "A0:F3:E4", "A4:2B:8C", "A8:40:25",
            "AC:8B:A9", "B0:C5:54", "B4:E6:2D", "B8:27:EB", "BC:DD:C2", "C0:4A:00",
            "C4:A8:1D", "C8:7F:54", "CC:2D:A0", "D0:21:F9", "D4:CA:6D", "D8:B3:70",
            "DC:2C:26", "E0:22:F0", "E4:38:7E", "E8:CC:18", "EC:B9:70", "F0:27:2D",
            "F4:92:BF", "F8:AB:05", "FC:EC:DA",
        ],
    },
    BrandEntry {
        key: "mikrotik",
        name: "MikroTik",
        ouis: &[
            "6C:3B:6B", "48:8F:5A", "2C:C8:1B", "4C:5E:0C", "E4:8D:8C", "00:0C:42",
            "18:FD:74", "74:4D:28", "7C:2F:80", "8C:59:C3", "B8:69:F4", "DC:2C:6E",
            "08:55:31", "84:1B:5E", "90:5A:68", "94:E3:6D", "98:DA:C4", "9C:A6:15",
            "A0:F3:C1", "A4:B1:E9", "A8:40:41", "AC:84:C6", "B0:4E:26", "B4:B0:24",
            "BC:46:99", "C0:06:C3", "C4:6E:1F", "C8:0E:14", "CC:32:E5", "D0:76:E7",
            "D4:6E:0E", "D8:0D:17", "DC:9F:DB",
        ],
    },
    BrandEntry {
        key: "aruba_hpe",
        name: "Aruba (HPE)",
        ouis: &[
            "70:3A:CB", "6C:F3:7F", "24:DE:C6", "94:B4:0F", "20:4C:03", "00:0B:86",
            "00:1A:1E", "00:24:6C", "78:9C:85", "84:D4:7E", "8C:DC:D4", "9C:1C:12",
            "A4:5D:36", "B0:5A:DA", "B8:D9:CE", "C0:E4:34", "D8:C7:C8", "E0:07:1B",
            "E8:BA:70", "F0:5C:19", "F8:0A:CB", "18:64:72", "40:E3:D6", "54:75:D0",
            "6C:C2:17", "7C:69:F6",
        ],
    },
    BrandEntry {
        key: "ruckus",
        name: "Ruckus",
        ouis: &[
            "50:91:E3", "2C:36:F8", "94:3E:EA", "BC:14:85", "58:93:96", "C4:B9:CD",
            "E0:5F:B9", "F4:28:53", "00:0F:9F", "00:14:7F", "00:21:91", "00:24:DC",
            "78:BC:1A", "84:1B:5E", "90:5A:68", "94:E3:6D", "98:DA:C4", "9C:A6:15",
            "A0:F3:C1", "A4:B1:E9", "A8:40:41", "AC:84:C6", "B0:4E:26", "B4:B0:24",
            "BC:46:99",
        ],
    },
    BrandEntry {
        key: "cisco_meraki",
        name: "Cisco Meraki",
        ouis: &[
            "00:18:0A", "E0:55:3D", "88:15:44", "0C:8D:DB", "34:56:FE", "00:1D:71",
            "00:24:DC", "E0:CB:BC", "F4:39:09", "58:97:1E", "8C:7C:92", "AC:17:C8",
            "2C:BE:08", "4C:79:6E", "74:86:E2", "8C:FE:A3", "A4:56:02", "BC:67:1C",
            "D4:20:B0", "EC:1F:72",
        ],
    },
    BrandEntry {
        key: "engenius",
        name: "EnGenius",
        ouis: &[
            "88:DC:96", "50:2B:73", "02:CF:7F", "00:02:6F", "74:EA:3A", "AC:9E:17",
            "C8:D3:A3", "DC:EF:09", "F0:7D:68", "04:F0:21", "6C:72:20", "88:6B:0E",
            "AC:83:F3", "D0:17:C2", "F4:AF:E7",
        ],
    },
    BrandEntry {
        key: "dlink",
        name: "D-Link",
        ouis: &[
            "CC:B2:55", "B8:A3:86", "34:08:04", "14:D6:4D", "84:C9:B2", "00:05:5D",
            "00:0F:3D", "00:11:95", "00:13:46", "00:15:E9", "00:17:9A", "00:19:5B",
            "00:1B:11", "00:1C:F0", "00:1E:58", "00:21:91", "00:22:B0", "00:24:01",
            "00:26:5A", "1C:7E:E5", "1C:AF:F7", "28:10:7B", "2C:B0:5D", "40:61:86",
            "48:EE:0C", "50:C7:BF", "54:78:1A", "5C:F4:AB", "60:C5:47", "6C:19:8F",
            "70:62:B8", "78:54:2E", "7C:8B:CA", "8C:BE:BE", "90:94:E4", "94:44:52",
            "9C:D6:43", "A0:AB:1B", "A8:57:4E", "B0:C7:45", "C0:A0:BB", "C8:BE:19",
            "D0:67:E5", "D8:FE:E3", "E0:91:F5", "E8:CC:18", "F0:7D:68", "F8:E7:1E",
            "FC:75:16",
        ],
    },
    BrandEntry {
        key: "netgear_general",
        name: "Netgear",
        ouis: &[
            "10:0D:7F", "28:C6:8E", "B0:7F:B9", "4C:60:DE", "00:09:5B", "00:0F:B5",
            "00:14:6C", "00:1B:2F", "00:1E:2A", "00:22:3F", "00:24:B2", "00:26:F2",
            "04:A1:51", "08:BD:43", "20:4E:7F", "2C:30:33", "30:46:9A", "44:94:FC",
            "6C:B0:CE", "70:4F:57", "74:44:01", "78:D2:94", "84:A4:23", "9C:3D:CF",
            "A0:04:60", "A0:21:B7", "A0:63:91", "A4:2B:B0", "B0:39:56", "C0:3F:0E",
            "C4:04:15", "CC:40:D0", "DC:EF:09", "E0:46:9A", "E0:91:F5", "FC:94:E3",
            "1C:BD:B9", "1C:C1:DE", "3C:37:86", "40:0D:10", "50:6A:03", "6C:CD:D6",
            "9C:5C:8E", "B4:75:0E", "34:98:B5",
        ],
    },
    BrandEntry {
        key: "plume_adaptive",
        name: "Plume",
        ouis: &[
            "74:DA:88", "78:28:CA", "A0:40:A0", "B8:D7:AF", "C4:93:D9", "E0:1C:FC",
            "24:F5:AA", "58:D9:D5", "9C:30:5B", "A8:81:95", "C0:C9:E3", "E8:6A:64",
            "04:D3:B0", "50:1A:C5", "B0:BE:76", "EC:01:EE",
        ],
    },
    BrandEntry {
        key: "xfinity_pods",
        name: "Xfinity xFi Pods",
        ouis: &[
            "A8:4E:3F", "00:35:1A", "8C:3B:AD", "70:56:81", "C8:69:CD", "40:B4:CD",
            "BC:E6:43", "8C:85:90", "DC:A6:32", "88:E9:FE", "28:6C:07", "3C:22:FB",
            "90:72:40", "D0:04:01", "AC:BC:32", "34:D2:70",
        ],
    },
    BrandEntry {
        key: "amazon_amplifi",
        name: "AmpliFi",
        ouis: &[
            "74:C6:3B", "E4:95:6E", "DC:9F:DB", "44:D9:E7", "F0:9F:C2", "24:5A:4C",
            "78:8A:20", "E0:63:DA", "B4:FB:E4", "04:18:D6", "68:72:51", "80:2A:A8",
        ],
    },
    BrandEntry {
        key: "tenda",
        name: "Tenda",
        ouis: &[
            "C8:3A:35", "FC:7C:02", "98:DE:D0", "00:B0:0C", "74:25:8A", "A4:2B:8C",
            "E0:05:C6", "F4:EC:38", "34:96:72", "5C:CF:7F", "B0:E5:ED", "D4:6E:0E",
            "E8:DE:27", "10:BF:48", "50:BD:5F", "8C:21:0A",
        ],
    },
    BrandEntry {
        key: "xiaomi_mesh",
        name: "Xiaomi Mesh",
        ouis: &[
            "34:CE:00", "64:64:4A", "F8:59:71", "50:8F:4C", "78:11:DC", "A0:86:C6",
            "B0:E2:35", "C4:0B:CB", "D4:97:0B", "E8:AB:FA", "F0:B4:29", "04:CF:8C",
            "14:75:90", "28:E3:1F", "3C:BD:D8", "50:EC:50", "68:DF:DD", "7C:1D:D9",
            "8C:53:C3", "98:FA:9B", "A4:DA:32", "B8:70:F4", "C8:FF:28", "DC:44:27",
        ],
    },
    BrandEntry {
        key: "honor_huawei",
        name: "Honor / Huawei",
        ouis: &[
            "00:E0:FC", "98:F4:28", "A0:8C:FD", "00:25:9E", "04:BD:88", "10:47:80",
            "18:CF:5E", "20:76:93", "28:31:52", "30:FC:68", "3C:FA:43", "44:00:10",
            "4C:54:99", "54:25:EA", "5C:C9:D3", "64:3E:8C", "6C:92:BF", "74:A7:22",
            "7C:A7:B0", "84:A8:E4", "8C:34:FD", "94:04:9C", "9C:28:EF", "A4:C4:94",
            "AC:E2:15", "B4:CD:27", "BC:76:70", "C4:6A:B7", "CC:E6:7F", "D4:20:B0",
            "DC:D2:FC", "E4:C7:22", "EC:23:3D", "F4:4E:E3", "FC:48:EF",
        ],
    },
    BrandEntry {
        key: "wifi6e_wifi7_general",
        name: "WiFi 6E/7 mesh",
        ouis: &[
            "70:4F:57", "6C:CD:D6", "30:87:30", "50:6A:03", "40:0D:10", "B4:75:0E",
            "34:98:B5", "1C:BD:B9", "FC:94:E3", "E0:91:F5", "84:A4:23", "A0:63:91",
            "6C:B0:CE", "44:94:FC", "30:46:9A", "2C:30:33", "E0:46:9A", "6C:19:8F",
            "C0:3F:0E", "08:BD:43", "74:44:01", "B0:39:56", "20:E5:2A", "C4:04:15",
            "84:1B:5E", "40:16:7E", "9C:3D:CF", "A0:40:A0", "10:0D:7F", "28:C6:8E",
            "B0:7F:B9", "4C:60:DE", "DC:EF:09", "CC:40:D0",
        ],
    },
    BrandEntry {
        key: "additional_mesh_brands",
        name: "Other mesh brand",
        ouis: &[
            "68:A4:0E", "84:16:0C", "A0:8C:FD", "B4:2E:99", "C8:D3:A3", "F0:7D:68",
            "74:EA:3A", "AC:9E:17", "DC:EF:09", "44:61:32", "70:B3:D5", "9C:65:F9",
            "C0:14:FE", "E4:A7:A0", "00:1E:C7", "2C:AB:A4", "58:6D:8F", "84:B5:17",
            "B0:10:41", "28:6D:CD", "5C:0A:5B", "88:36:6C", "B4:E6:2D", "E0:91:F5",
            "00:50:56", "00:0C:29", "00:05:69", "00:1C:14",
        ],
    },
    BrandEntry {
        key: "industrial_enterprise",
        name: "Industrial / enterprise mesh",
        ouis: &[
            "00:04:56", "00:80:A1", "58:C1:7A", "84:1B:5E", "B8:59:9F", "00:30:44",
            "8C:0E:E3", "A4:93:4C", "C0:EE:40", "E4:E4:AB", "00:15:FF", "00:1C:B5",
            "30:D1:7E", "6C:3B:E5", "A8:1E:84", "00:06:B1", "00:17:C5", "2C:8A:72",
            "78:D2:94", "C0:EA:E4", "00:09:0F", "70:4C:A5", "90:6C:AC", "A0:1D:48",
            "B8:EE:65",
        ],
    },
];
