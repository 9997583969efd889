//! Static configuration: the 42 confirmed teams, their search terms for the
//! id-mapping builder, the hand-maintained manager table, and default file
//! locations.

use std::path::PathBuf;

pub fn default_mapping_path() -> PathBuf {
    PathBuf::from("data/team-api-mapping.json")
}
pub fn default_squads_path() -> PathBuf {
    PathBuf::from("data/squads.json")
}
pub fn default_cache_dir() -> PathBuf {
    PathBuf::from("data/.squad-cache")
}
pub fn default_exclusions_path() -> PathBuf {
    PathBuf::from("data/exclusions.json")
}

/// Internal team code to a search term the id-resolution endpoint recognises.
pub const TEAMS: [(&str, &str); 42] = [
    ("mex", "Mexico"),
    ("rsa", "South Africa"),
    ("kor", "South Korea"),
    ("can", "Canada"),
    ("qat", "Qatar"),
    ("sui", "Switzerland"),
    ("bra", "Brazil"),
    ("mar", "Morocco"),
    ("sco", "Scotland"),
    ("hti", "Haiti"),
    ("usa", "USA"),
    ("pry", "Paraguay"),
    ("aus", "Australia"),
    ("deu", "Germany"),
    ("cuw", "Curacao"),
    ("civ", "Ivory Coast"),
    ("ecu", "Ecuador"),
    ("nld", "Netherlands"),
    ("jpn", "Japan"),
    ("tun", "Tunisia"),
    ("bel", "Belgium"),
    ("egy", "Egypt"),
    ("irn", "Iran"),
    ("nzl", "New Zealand"),
    ("esp", "Spain"),
    ("cpv", "Cape Verde"),
    ("sau", "Saudi Arabia"),
    ("ury", "Uruguay"),
    ("fra", "France"),
    ("sen", "Senegal"),
    ("nor", "Norway"),
    ("arg", "Argentina"),
    ("dza", "Algeria"),
    ("aut", "Austria"),
    ("jor", "Jordan"),
    ("prt", "Portugal"),
    ("uzb", "Uzbekistan"),
    ("col", "Colombia"),
    ("eng", "England"),
    ("hrv", "Croatia"),
    ("gha", "Ghana"),
    ("pan", "Panama"),
];

/// Manager names are not available upstream and are maintained by hand.
const MANAGERS: [(&str, &str); 42] = [
    ("eng", "Thomas Tuchel"),
    ("bra", "Dorival Júnior"),
    ("fra", "Didier Deschamps"),
    ("arg", "Lionel Scaloni"),
    ("esp", "Luis de la Fuente"),
    ("deu", "Julian Nagelsmann"),
    ("prt", "Roberto Martínez"),
    ("nld", "Ronald Koeman"),
    ("usa", "Mauricio Pochettino"),
    ("mex", "Javier Aguirre"),
    ("can", "Jesse Marsch"),
    ("bel", "Domenico Tedesco"),
    ("hrv", "Zlatko Dalić"),
    ("ury", "Marcelo Bielsa"),
    ("col", "Néstor Lorenzo"),
    ("jpn", "Hajime Moriyasu"),
    ("kor", "Hong Myung-bo"),
    ("aus", "Tony Popovic"),
    ("mar", "Walid Regragui"),
    ("sen", "Aliou Cissé"),
    ("sui", "Murat Yakın"),
    ("ecu", "Sebastián Beccacece"),
    ("gha", "Otto Addo"),
    ("civ", "Emerse Faé"),
    ("egy", "Hossam Hassan"),
    ("sau", "Roberto Mancini"),
    ("irn", "Amir Ghalenoei"),
    ("qat", "Luis García"),
    ("tun", "Faouzi Benzarti"),
    ("pan", "Thomas Christiansen"),
    ("pry", "Alfaro Moreno"),
    ("nor", "Ståle Solbakken"),
    ("aut", "Ralf Rangnick"),
    ("sco", "Steve Clarke"),
    ("dza", "Vladimir Petković"),
    ("jor", "Hussein Ammouta"),
    ("uzb", "Srecko Katanec"),
    ("nzl", "Darren Bazeley"),
    ("cpv", "Bubista"),
    ("hti", "Marc Collat"),
    ("cuw", "Dick Advocaat"),
    ("rsa", "Hugo Broos"),
];

pub fn manager_for(team: &str) -> Option<&'static str> {
    MANAGERS
        .iter()
        .find(|(code, _)| *code == team)
        .map(|&(_, name)| name)
}
