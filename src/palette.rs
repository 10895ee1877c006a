use std::collections::HashMap;

use once_cell::sync::Lazy;
use ratatui::style::Color;

const TEAM_COLORS: &[(&str, &str)] = &[
    ("Kashima Antlers", "#B71940"),
    ("Kashiwa Reysol", "#FFF000"),
    ("Urawa Red Diamonds", "#E6002D"),
    ("FC Tokyo", "#3E4C8D"),
    ("Tokyo Verdy", "#006931"),
    ("FC Machida Zelvia", "#0056A5"),
    ("Kawasaki Frontale", "#319FDA"),
    ("Yokohama F. Marinos", "#014099"),
    ("Yokohama FC", "#4BC1FE"),
    ("Shonan Bellmare", "#9EFF26"),
    ("Albirex Niigata", "#FE641E"),
    ("Shimizu S-Pulse", "#FF8901"),
    ("Nagoya Grampus", "#F8B500"),
    ("Kyoto Sanga FC", "#820064"),
    ("Gamba Osaka", "#00458D"),
    ("Cerezo Osaka", "#DB005B"),
    ("Vissel Kobe", "#A60129"),
    ("Fagiano Okayama", "#A72041"),
    ("Sanfrecce Hiroshima", "#603D97"),
    ("Avispa Fukuoka", "#9EB5C7"),
    ("Hokkaido Consadole Sapporo", "#125D75"),
    ("Vegalta Sendai", "#FFC20E"),
    ("AFC Blaublitz Akita", "#0D5790"),
    ("Montedio Yamagata", "#F7F4A6"),
    ("Iwaki SC", "#C01630"),
    ("Mito Hollyhock", "#2E3192"),
    ("Omiya Ardija", "#EC6601"),
    ("JEF United Ichihara Chiba", "#FFDE00"),
    ("Ventforet Kofu", "#0F63A3"),
    ("Kataller Toyama", "#25458F"),
    ("Jubilo Iwata", "#7294BA"),
    ("Fujieda MYFC", "#875884"),
    ("Renofa Yamaguchi", "#F26321"),
    ("Tokushima Vortis", "#11233F"),
    ("Ehime FC", "#ED9A4C"),
    ("FC Imabari", "#908E3C"),
    ("Sagan Tosu", "#30B7D7"),
    ("V-Varen Nagasaki", "#013893"),
    ("Roasso Kumamoto", "#A92D27"),
    ("Oita Trinita", "#254398"),
    ("Vanraure Hachinohe", "#13A63B"),
    ("Fukushima United FC", "#CF230C"),
    ("Tochigi SC", "#0170A4"),
    ("Tochigi City", "#001030"),
    ("ThespaKusatsu Gunma", "#08406F"),
    ("SC Sagamihara", "#408B52"),
    ("AC Parceiro Nagano", "#E36A2A"),
    ("Matsumoto Yamaga FC", "#004B1D"),
    ("Ishikawa FC Zweigen Kanazawa", "#3B1216"),
    ("FC Azul Claro Numazu", "#13A7DE"),
    ("FC Gifu", "#126246"),
    ("FC Osaka", "#90C9E2"),
    ("Nara Club", "#011D64"),
    ("Gainare Tottori", "#96C692"),
    ("Kamatamare Sanuki", "#669FB9"),
    ("Kochi United SC", "#B21E23"),
    ("Giravanz Kitakyushu", "#E8BD00"),
    ("Tegevajaro Miyazaki FC", "#F6E066"),
    ("Kagoshima United FC", "#19315F"),
    ("FC Ryūkyū", "#AA131B"),
];

const FALLBACK: [Color; 8] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::LightBlue,
    Color::LightRed,
    Color::LightGreen,
    Color::White,
];

static COLORS: Lazy<HashMap<&'static str, Color>> = Lazy::new(|| {
    TEAM_COLORS
        .iter()
        .filter_map(|(team, hex)| parse_hex(hex).map(|c| (*team, c)))
        .collect()
});

/// Club color for a team; unknown teams get a stable color derived from the name.
pub fn team_color(team: &str) -> Color {
    if let Some(color) = COLORS.get(team) {
        return *color;
    }
    let hash = team
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
    FALLBACK[hash as usize % FALLBACK.len()]
}

fn parse_hex(raw: &str) -> Option<Color> {
    let hex = raw.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
