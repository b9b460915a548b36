// src/ranker/prompt.rs

use crate::domain::Listing;

/// Markers around the usable description inside the raw page text.
const DESCRIPTION_START: &str = "kontakty  mapa";
const DESCRIPTION_END: &str = "Kontakt na pronajímatele nebo provozovatele";

const PROMPT_V2: &str = r#"
I want to go to organize an event for more then 25 of my friends.
Anything with lower capacity would need to be really amazing for us to consider. In general capacity around 30 places is ideal because we have more flexibility.
We are looking for accommodation and we needs something with a nice common room to play board games, therefore we need many chairs and tables.
We prefer not to have more than 5 people in one room.
We also love PC games so we need a place where to put the desktops and ideally a good internet connection.
Places where the owner stays with us are probably not great because we have long nights and that may be uncomfortable for the owner. So places like guesthouses (penzion in Czech) are not great.
Also apartments are a no-go for us we need to rent the whole property.

The descriptions I will provide will be in Czech but always reply in English.

Make sure to take the visitor reviews with a grain of salt mainly when there is not enough of them.

We already visited the following 2 accommodations with my friends and we really liked it.

The structured description of the first accommodation follows:
{first}

The structured description of the second accommodation follows:
{second}

The structured description of the accommodation which should be rated follows:
{candidate}

Your task is to rate the described object based on our requirements in json format containing the following fields (and only that):
* "rating": which is a number between 0 and 1 where 1 means very suitable object for the event.
* "description": max one sentence description for the object. Examples: "Fancy wooden cottage with sauna.", "Moldy dump."
* "owner_in_house": boolean, if the owner is present in the house which may be mentioned in the equipment or visitor reviews.
* "explanation": Explain the motivation for the rating.

{images_note}Make sure to reply with only the valid JSON and nothing more and only in english!
"#;

const PROMPT_V3: &str = r#"
I want to organize an event for more then 25 of my friends.
Anything with lower capacity would need to be really amazing for us to consider. In general capacity around 30 places is ideal because we have more flexibility.
We are looking for accommodation and we needs something with a nice common room to play board games, therefore we need many chairs and tables.
We prefer not to have more than 5 people in one room.
We also love PC games so we need a place where to put the desktops and ideally a good internet connection.
Places where the owner stays with us are probably not great because we have long nights and that may be uncomfortable for the owner. So places like guesthouses (penzion in Czech) are not great.
Also apartments are a no-go for us we need to rent the whole property.
We do not care about winter amenities because our event is happening in September.

The descriptions I will provide will be in Czech but always reply in English.

Make sure to take the visitor reviews with a grain of salt mainly when there is not enough of them.

We already visited the following 2 accommodations with my friends and we really liked it.

The structured description of the first accommodation follows:
{first}

The structured description of the second accommodation follows:
{second}

The structured description of the accommodation which should be rated follows:
{candidate}

Your task is to rate the described object based on our requirements in json format containing the following fields (and only that):
* "rating": which is a number between 0 and 1 where 1 means very suitable object for the event.
* "description": max one sentence description for the object. Examples: "Fancy wooden cottage with sauna.", "Moldy dump."
* "owner_in_house": boolean, if the owner is present in the house which may be mentioned in the equipment or visitor reviews.
* "explanation": Explain the motivation for the rating.

{images_note}Make sure to reply with only the valid JSON and nothing more and only in english!
"#;

pub fn template(version: &str) -> Option<&'static str> {
    match version {
        "v2" => Some(PROMPT_V2),
        "v3" => Some(PROMPT_V3),
        _ => None,
    }
}

pub fn build_prompt(
    version: &str,
    first: &str,
    second: &str,
    candidate: &str,
    include_images: bool,
) -> Option<String> {
    let images_note = if include_images {
        "Do not forget to use attached images of the accommodation for the analysis.\n"
    } else {
        ""
    };
    Some(
        template(version)?
            .replace("{first}", first)
            .replace("{second}", second)
            .replace("{candidate}", candidate)
            .replace("{images_note}", images_note),
    )
}

fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace('\n', " ")
}

/// The description is the slice of the page text between the header
/// navigation marker and the landlord-contact section; missing markers
/// degrade to an empty description rather than failing the listing.
fn description_of(listing: &Listing) -> String {
    let flat = single_line(&listing.text);
    let before_contact = flat
        .split(DESCRIPTION_END)
        .next()
        .unwrap_or_default();
    before_contact
        .split_once(DESCRIPTION_START)
        .map(|(_, rest)| rest)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Render one listing as the structured text block the prompts embed.
pub fn format_listing(listing: &Listing) -> String {
    let reviews: Vec<String> = listing
        .ratings
        .iter()
        .map(|review| format!("  * {}", review.replace("\r\n", " ").replace('\n', "")))
        .collect();

    let bad_features: Vec<String> = listing
        .filtered_reasons
        .iter()
        .map(|reason| reason.label())
        .collect();

    format!(
        "\nName: {}\nCapacity: {}\nRooms: {}\nFeatures: {}\nEquipment: {}\nPrice: {}\nBad features: {}\nDescription: {}\nVisitor reviews: \n{}\n",
        listing.name,
        listing.capacity.map(|c| c.to_string()).unwrap_or_default(),
        listing.rooms.map(|r| r.to_string()).unwrap_or_default(),
        listing.icons.join(","),
        listing.equipment.join(","),
        listing.price_per_day.unwrap_or(0),
        bad_features.join(","),
        description_of(listing),
        reviews.join("\n"),
    )
}
