// scraper.rs
use crate::domain::{Gps, Listing};
use crate::scraper::ScraperError;
use rand::Rng;
use regex::Regex;
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;
use std::time::Duration;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

const SEARCH_URL: &str = "https://www.e-chalupy.cz/hledam/#zalozka_prehled";

/// The directory numbers its regions; ids above this return nothing.
const MAX_REGION_ID: u32 = 100;

fn capacity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:\d*\saž\s)?(\d+)\sosob(?:\s\|\s(\d+)?)?").unwrap())
}

fn gps_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"GPS .*: (\d+\.\d+)N, (\d+\.\d+)E").unwrap())
}

fn overall_rating_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Celkové hodnocení:\s+(\d+)%").unwrap())
}

pub struct CottageScraper {
    client: Client,
}

impl CottageScraper {
    pub fn new() -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        Ok(Self { client })
    }

    /// Walk every region of the search form and collect listing URLs.
    /// Region pages that link sub-region indexes are filtered out by the
    /// `.php` suffix check.
    pub fn collect_listing_urls(
        &self,
        capacity: u32,
        rooms: u32,
    ) -> Result<Vec<String>, ScraperError> {
        let mut urls = BTreeSet::new();
        for region in 1..MAX_REGION_ID {
            match self.search_region(region, capacity, rooms) {
                Ok(found) => {
                    if !found.is_empty() {
                        eprintln!("✅ region {region}: {} listings", found.len());
                    }
                    urls.extend(found.into_iter().filter(|u| u.ends_with(".php")));
                }
                Err(e) => {
                    eprintln!("⚠️ region {region} search failed: {e}");
                }
            }
        }
        eprintln!("🏁 total found {}", urls.len());
        Ok(urls.into_iter().collect())
    }

    fn search_region(
        &self,
        region: u32,
        capacity: u32,
        rooms: u32,
    ) -> Result<BTreeSet<String>, ScraperError> {
        let mut form = HashMap::new();
        form.insert("fkapacita", capacity.to_string());
        form.insert("fpokoje", rooms.to_string());
        form.insert("ftyp", "0".to_string());
        form.insert("fid_oblasti", region.to_string());
        form.insert("furl_okres", "0".to_string());
        form.insert("fid_obec", "0".to_string());
        form.insert("finternet", String::new());
        form.insert("hledej_podrobne", "HLEDEJ".to_string());

        let response = self
            .client
            .post(SEARCH_URL)
            .form(&form)
            .send()
            .map_err(|e| ScraperError::Network(e.to_string()))?;
        let html = response
            .text()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        Self::extract_search_results(&html)
    }

    fn extract_search_results(html: &str) -> Result<BTreeSet<String>, ScraperError> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("#vysledky_hledani .pl h3 a")
            .map_err(|e| ScraperError::HtmlParse(e.to_string()))?;

        let mut urls = BTreeSet::new();
        for link in document.select(&selector) {
            if let Some(href) = link.value().attr("href") {
                urls.insert(href.to_string());
            }
        }
        Ok(urls)
    }

    /// Fetch and parse one listing page, with a bounded retry loop around
    /// the network call.
    pub fn fetch_listing(&self, url: &str) -> Result<Listing, ScraperError> {
        const MAX_ATTEMPTS: u64 = 3;
        const MAX_BACKOFF_SECS: u64 = 10;
        const JITTER_MAX_SECS: u64 = 2;

        let mut last_err = None;

        for attempt in 1..=MAX_ATTEMPTS {
            match self.try_fetch_html(url) {
                Ok(html) => return Self::parse_listing(&html, url),
                Err(e) => {
                    eprintln!("⚠️ attempt {attempt} for {url} failed: {e}");
                    last_err = Some(e);

                    // backoff
                    let base = std::cmp::min(2 * attempt, MAX_BACKOFF_SECS);
                    let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_SECS);
                    std::thread::sleep(Duration::from_secs(base + jitter));
                }
            }
        }

        Err(last_err.unwrap_or_else(|| ScraperError::Network("retry loop failed".into())))
    }

    fn try_fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ScraperError::Network(format!("HTTP {status} : {url}")));
        }

        Ok(text)
    }

    /// Extract every raw field from the listing block. Identity fields
    /// (id, name) are required; everything else degrades to empty/missing
    /// and is sorted out downstream by the normalizer and filter.
    pub fn parse_listing(html: &str, url: &str) -> Result<Listing, ScraperError> {
        let document = Html::parse_document(html);
        let block = select_one(document.root_element(), ".chata")
            .ok_or(ScraperError::MissingBlock(".chata"))?;

        let id = select_text(block, "#cislo_o").ok_or(ScraperError::MissingBlock("#cislo_o"))?;
        let name = select_text(block, "h1").ok_or(ScraperError::MissingBlock("h1"))?;
        let locality = select_text(block, "h2").unwrap_or_default();

        let mut listing = Listing::new(url.to_string(), id, name, locality);

        if let Some(capacity_text) = select_text(block, "#kapacita") {
            if let Some(captures) = capacity_regex().captures(&clean(&capacity_text)) {
                listing.capacity = captures.get(1).and_then(|m| m.as_str().parse().ok());
                listing.rooms = captures.get(2).and_then(|m| m.as_str().parse().ok());
            }
        }

        listing.icons = select_one(block, "#ikony")
            .map(|icons| attr_values(icons, "*", "alt"))
            .unwrap_or_default();

        if let Some(contact) = select_one(block, "#kontakty") {
            listing.contact_raw = clean(&element_text(contact));
            listing.contact_links = attr_values(contact, "a", "href");
        }

        listing.map_link =
            select_one(block, "#vetsi_mapa").and_then(|a| a.value().attr("href").map(String::from));

        if let Some(dest) = select_one(block, "#dest") {
            listing.distances = select_all(dest, "tr")
                .into_iter()
                .filter_map(|row| {
                    let cells = select_all(row, "td");
                    match cells.as_slice() {
                        [place, dist, ..] => Some((
                            clean(&element_text(*place)),
                            clean(&element_text(*dist)),
                        )),
                        _ => None,
                    }
                })
                .collect();
        }

        listing.equipment = select_all(block, ".prehled img")
            .into_iter()
            .filter_map(|img| img.value().attr("alt").map(String::from))
            .collect();

        for review in select_all(block, ".recenze") {
            let text = element_text(review);
            if let Some(captures) = overall_rating_regex().captures(&text) {
                if let Ok(pct) = captures[1].parse() {
                    listing.numeric_ratings.push(pct);
                }
            }
            listing.ratings.push(text);
        }

        listing.place = select_text(block, ".kamdal").map(|t| clean(&t)).unwrap_or_default();

        listing.pricelist = select_one(block, "#cenik")
            .map(|cenik| {
                select_all(cenik, "td")
                    .into_iter()
                    .map(|td| clean(&element_text(td)))
                    .collect()
            })
            .unwrap_or_default();

        if let Some(gallery) = select_one(block, "#nahledy") {
            listing.images = select_all(gallery, "a")
                .into_iter()
                .filter_map(|a| {
                    let href = a.value().attr("href")?.to_string();
                    let title = a.value().attr("title").map(String::from);
                    Some((title, href))
                })
                .collect();
        }

        listing.text = element_text(block);

        if let Some(captures) = gps_regex().captures(&listing.text) {
            listing.gps = Some(Gps {
                n: captures[1].to_string(),
                e: captures[2].to_string(),
            });
        }

        Ok(listing)
    }
}

fn clean(s: &str) -> String {
    s.replace(['\r', '\n'], "")
}

fn select_one<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    // selectors here are fixed strings; a typo shows up as a missing block
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };
    scope.select(&selector).collect()
}

fn select_text(scope: ElementRef<'_>, css: &str) -> Option<String> {
    select_one(scope, css).map(element_text)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

fn attr_values(scope: ElementRef<'_>, css: &str, attr: &str) -> Vec<String> {
    select_all(scope, css)
        .into_iter()
        .filter_map(|el| el.value().attr(attr).map(String::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_HTML: &str = r##"
    <html><body><div class="chata">
      <h1>Chalupa Pazderna</h1>
      <h2>Pecka</h2>
      <span id="cislo_o">objekt č. 1234</span>
      <div id="kapacita">20 až 24 osob | 8 pokojů</div>
      <div id="ikony"><img alt="Domácí mazlíčci vítáni"><img alt="Sauna"></div>
      <div id="kontakty">Telefon: 123 456 789
        <a href="http://www.pazderna.cz">web</a>
        <a href="#">mapa</a>
      </div>
      <a id="vetsi_mapa" href="https://mapy.cz/x">větší mapa</a>
      <table id="dest">
        <tr><td>Les</td><td>500 m</td></tr>
        <tr><td>Restaurace</td><td>2 km</td></tr>
      </table>
      <div class="prehled"><img alt="Wi-Fi"><img alt="Parkoviště"></div>
      <div class="recenze">Jaro 2024 Celkové hodnocení:  95% super pobyt</div>
      <div class="kamdal">Pecka - další výlety</div>
      <table id="cenik"><tr><td>Cena za objekt a noc</td><td>letní sezóna 8000 Kč</td></tr></table>
      <div id="nahledy">
        <a title="Chalupa zvenku" href="https://img.example.cz/1.jpg">x</a>
        <a href="https://img.example.cz/2.jpg">y</a>
      </div>
      <p>GPS souřadnice: 50.4812N, 15.6078E</p>
    </div></body></html>"##;

    #[test]
    fn listing_page_parses_every_field() {
        let listing = CottageScraper::parse_listing(
            LISTING_HTML,
            "https://www.e-chalupy.cz/cesky_raj/chalupa-1234.php",
        )
        .unwrap();

        assert_eq!(listing.id, "objekt č. 1234");
        assert_eq!(listing.name, "Chalupa Pazderna");
        assert_eq!(listing.locality, "Pecka");
        assert_eq!(listing.capacity, Some(24));
        assert_eq!(listing.rooms, Some(8));
        assert_eq!(listing.icons, vec!["Domácí mazlíčci vítáni", "Sauna"]);
        assert_eq!(listing.contact_links, vec!["http://www.pazderna.cz", "#"]);
        assert_eq!(listing.map_link.as_deref(), Some("https://mapy.cz/x"));
        assert_eq!(
            listing.distances,
            vec![
                ("Les".to_string(), "500 m".to_string()),
                ("Restaurace".to_string(), "2 km".to_string()),
            ]
        );
        assert_eq!(listing.equipment, vec!["Wi-Fi", "Parkoviště"]);
        assert_eq!(listing.numeric_ratings, vec![95]);
        assert_eq!(listing.ratings.len(), 1);
        assert_eq!(
            listing.pricelist,
            vec!["Cena za objekt a noc", "letní sezóna 8000 Kč"]
        );
        assert_eq!(listing.images.len(), 2);
        assert_eq!(listing.images[0].0.as_deref(), Some("Chalupa zvenku"));
        assert_eq!(listing.images[1].0, None);

        let gps = listing.gps.unwrap();
        assert_eq!(gps.n, "50.4812");
        assert_eq!(gps.e, "15.6078");
    }

    #[test]
    fn page_without_listing_block_is_an_error() {
        let err = CottageScraper::parse_listing("<html><body></body></html>", "https://x.cz/a.php")
            .unwrap_err();
        assert!(matches!(err, ScraperError::MissingBlock(".chata")));
    }

    #[test]
    fn search_results_extract_hrefs() {
        let html = r##"
        <div id="vysledky_hledani">
          <div class="pl"><h3><a href="https://www.e-chalupy.cz/krkonose/chata-1.php">Chata 1</a></h3></div>
          <div class="pl"><h3><a href="https://www.e-chalupy.cz/krkonose/">region index</a></h3></div>
        </div>"##;

        let urls = CottageScraper::extract_search_results(html).unwrap();

        assert!(urls.contains("https://www.e-chalupy.cz/krkonose/chata-1.php"));
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn capacity_variants() {
        let re = capacity_regex();

        let caps = re.captures("20 až 24 osob | 8").unwrap();
        assert_eq!(&caps[1], "24");
        assert_eq!(caps.get(2).map(|m| m.as_str()), Some("8"));

        let caps = re.captures("18 osob").unwrap();
        assert_eq!(&caps[1], "18");
        assert_eq!(caps.get(2), None);
    }
}
