//! Static article catalog.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Article {
    pub slug: &'static str,
    pub title: &'static str,
    pub image_url: &'static str,
    pub description: &'static str,
}

pub static ARTICLES: [Article; 5] = [
    Article {
        slug: "blackheads",
        title: "Jerawat Blackheads (Komedo Hitam)",
        image_url: "/images/artikel/blackheads.jpg",
        description: "Blackheads atau komedo hitam adalah pori-pori yang tersumbat oleh minyak dan sel kulit mati yang terpapar udara sehingga berubah warna menjadi hitam.",
    },
    Article {
        slug: "whiteheads",
        title: "Jerawat Whiteheads (Komedo Putih)",
        image_url: "/images/artikel/whiteheads.jpg",
        description: "Whiteheads atau komedo putih adalah pori-pori yang tersumbat oleh minyak dan sel kulit mati yang tertutup lapisan kulit, sehingga tampak sebagai benjolan kecil berwarna putih.",
    },
    Article {
        slug: "papula",
        title: "Jerawat Papula",
        image_url: "/images/artikel/papula.jpg",
        description: "Papula adalah jenis jerawat yang meradang, terasa sakit saat disentuh, dan terlihat kemerahan tanpa nanah di permukaan kulit.",
    },
    Article {
        slug: "pustula",
        title: "Jerawat Pustula",
        image_url: "/images/artikel/pustula.jpg",
        description: "Pustula adalah jerawat yang berisi nanah di tengahnya, berwarna putih atau kuning, dan dikelilingi oleh peradangan kemerahan.",
    },
    Article {
        slug: "kistik",
        title: "Jerawat Kistik (Cystic Acne)",
        image_url: "/images/artikel/kistik.jpg",
        description: "Jerawat kistik adalah jenis jerawat parah yang terbentuk jauh di bawah permukaan kulit, berisi nanah, terasa nyeri, dan berisiko meninggalkan bekas luka permanen.",
    },
];

pub fn find_article(slug: &str) -> Option<&'static Article> {
    ARTICLES.iter().find(|a| a.slug == slug)
}
