//! Seed Service
//!
//! Idempotent bootstrap data: an admin account, the default categories and
//! tags, and two published sample posts. Rows whose email or slug already
//! exist are left untouched.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::auth_service::{hash_password, normalize_email};
use crate::config::SeedSettings;
use crate::domain::{
    BlogPost, BlogPostRepository, BlogPostStatus, BlogPostType, Category, CategoryRepository,
    SeoMetadata, Tag, TagRepository, User, UserRepository, UserRole,
};
use crate::shared::error::AppError;

struct CategorySeed {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    sort_order: i32,
}

struct TagSeed {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    color: &'static str,
}

struct PostSeed {
    title: &'static str,
    slug: &'static str,
    excerpt: &'static str,
    content: &'static str,
    category_index: usize,
    tag_index: usize,
    meta_title: &'static str,
    meta_description: &'static str,
    keywords: &'static [&'static str],
}

const CATEGORIES: [CategorySeed; 4] = [
    CategorySeed {
        name: "Sức khỏe tổng quát",
        slug: "suc-khoe-tong-quat",
        description: "Các bài viết về sức khỏe tổng quát",
        sort_order: 1,
    },
    CategorySeed {
        name: "Thuốc và điều trị",
        slug: "thuoc-va-dieu-tri",
        description: "Thông tin về thuốc và phương pháp điều trị",
        sort_order: 2,
    },
    CategorySeed {
        name: "Dinh dưỡng",
        slug: "dinh-duong",
        description: "Kiến thức về dinh dưỡng và ăn uống lành mạnh",
        sort_order: 3,
    },
    CategorySeed {
        name: "Phòng bệnh",
        slug: "phong-benh",
        description: "Các biện pháp phòng ngừa bệnh tật",
        sort_order: 4,
    },
];

const TAGS: [TagSeed; 4] = [
    TagSeed {
        name: "Tim mạch",
        slug: "tim-mach",
        description: "Các vấn đề về tim mạch",
        color: "#ff6b6b",
    },
    TagSeed {
        name: "Tiểu đường",
        slug: "tieu-duong",
        description: "Bệnh tiểu đường và điều trị",
        color: "#4ecdc4",
    },
    TagSeed {
        name: "Huyết áp",
        slug: "huyet-ap",
        description: "Vấn đề huyết áp cao/thấp",
        color: "#45b7d1",
    },
    TagSeed {
        name: "Vitamin",
        slug: "vitamin",
        description: "Các loại vitamin và bổ sung",
        color: "#96ceb4",
    },
];

const POSTS: [PostSeed; 2] = [
    PostSeed {
        title: "10 Cách giữ gìn sức khỏe tim mạch",
        slug: "10-cach-giu-gin-suc-khoe-tim-mach",
        excerpt: "Tìm hiểu về những cách đơn giản nhưng hiệu quả để bảo vệ sức khỏe tim mạch của bạn.",
        content: "# 10 Cách giữ gìn sức khỏe tim mạch\n\n\
Sức khỏe tim mạch là nền tảng của một cuộc sống khỏe mạnh.\n\n\
## 1. Tập thể dục thường xuyên\n- Dành ít nhất 30 phút mỗi ngày cho hoạt động thể chất\n\n\
## 2. Ăn uống lành mạnh\n- Tăng cường rau xanh và trái cây\n- Hạn chế thực phẩm chế biến sẵn\n\n\
## 3. Kiểm soát cân nặng\n## 4. Không hút thuốc\n## 5. Hạn chế đồ uống có cồn\n\
## 6. Quản lý stress\n## 7. Ngủ đủ giấc\n## 8. Kiểm tra sức khỏe định kỳ\n\
## 9. Kiểm soát các bệnh lý\n## 10. Giữ mối quan hệ xã hội tốt\n\n\
Hãy bắt đầu từ những thay đổi nhỏ và duy trì lâu dài để có một trái tim khỏe mạnh!\n",
        category_index: 0,
        tag_index: 0,
        meta_title: "10 Cách giữ gìn sức khỏe tim mạch hiệu quả",
        meta_description: "Khám phá 10 cách đơn giản nhưng hiệu quả để bảo vệ sức khỏe tim mạch.",
        keywords: &["sức khỏe tim mạch", "bảo vệ tim", "phòng bệnh tim mạch"],
    },
    PostSeed {
        title: "Hiểu đúng về bệnh tiểu đường type 2",
        slug: "hieu-dung-ve-benh-tieu-duong-type-2",
        excerpt: "Tất cả những gì bạn cần biết về bệnh tiểu đường type 2, từ nguyên nhân đến cách điều trị.",
        content: "# Hiểu đúng về bệnh tiểu đường type 2\n\n\
Bệnh tiểu đường type 2 là tình trạng cơ thể không thể sử dụng insulin hiệu quả, dẫn đến tăng đường huyết.\n\n\
## Triệu chứng\n- Khát nước nhiều\n- Đi tiểu thường xuyên\n- Mệt mỏi\n\n\
## Điều trị\n- Thay đổi lối sống\n- Metformin\n- Theo dõi đường huyết thường xuyên\n\n\
Việc hiểu đúng và điều trị kịp thời sẽ giúp kiểm soát bệnh hiệu quả!\n",
        category_index: 1,
        tag_index: 1,
        meta_title: "Bệnh tiểu đường type 2: Nguyên nhân, triệu chứng và điều trị",
        meta_description: "Tìm hiểu đầy đủ về bệnh tiểu đường type 2 và phương pháp điều trị hiệu quả.",
        keywords: &["tiểu đường type 2", "đường huyết", "insulin"],
    },
];

/// What a seeding run inserted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub categories_created: usize,
    pub tags_created: usize,
    pub posts_created: usize,
}

pub struct SeedService<U, C, T, P>
where
    U: UserRepository,
    C: CategoryRepository,
    T: TagRepository,
    P: BlogPostRepository,
{
    user_repo: Arc<U>,
    category_repo: Arc<C>,
    tag_repo: Arc<T>,
    post_repo: Arc<P>,
}

impl<U, C, T, P> SeedService<U, C, T, P>
where
    U: UserRepository,
    C: CategoryRepository,
    T: TagRepository,
    P: BlogPostRepository,
{
    pub fn new(user_repo: Arc<U>, category_repo: Arc<C>, tag_repo: Arc<T>, post_repo: Arc<P>) -> Self {
        Self {
            user_repo,
            category_repo,
            tag_repo,
            post_repo,
        }
    }

    pub async fn run(&self, settings: &SeedSettings) -> Result<SeedReport, AppError> {
        let mut report = SeedReport::default();

        let (admin_id, admin_created) = self.ensure_admin(settings).await?;
        report.admin_created = admin_created;

        let mut category_ids = Vec::with_capacity(CATEGORIES.len());
        for seed in &CATEGORIES {
            let (id, created) = self.ensure_category(seed).await?;
            category_ids.push(id);
            report.categories_created += usize::from(created);
        }

        let mut tag_ids = Vec::with_capacity(TAGS.len());
        for seed in &TAGS {
            let (id, created) = self.ensure_tag(seed).await?;
            tag_ids.push(id);
            report.tags_created += usize::from(created);
        }

        for seed in &POSTS {
            if self.post_repo.find_by_slug(seed.slug).await?.is_some() {
                continue;
            }

            let mut post = BlogPost::new(
                seed.title.to_string(),
                seed.slug.to_string(),
                seed.content.to_string(),
                admin_id,
            );
            post.excerpt = Some(seed.excerpt.to_string());
            post.post_type = BlogPostType::Health;
            post.category_id = category_ids.get(seed.category_index).copied();
            post.tag_id = tag_ids.get(seed.tag_index).copied();
            post.seo_metadata = Some(SeoMetadata {
                meta_title: Some(seed.meta_title.to_string()),
                meta_description: Some(seed.meta_description.to_string()),
                keywords: seed.keywords.iter().map(|k| k.to_string()).collect(),
            });
            post.transition_to(BlogPostStatus::Published, Utc::now());

            self.post_repo.create(&post).await?;
            report.posts_created += 1;
        }

        tracing::info!(
            admin_created = report.admin_created,
            categories = report.categories_created,
            tags = report.tags_created,
            posts = report.posts_created,
            "Seed completed"
        );

        Ok(report)
    }

    async fn ensure_admin(&self, settings: &SeedSettings) -> Result<(Uuid, bool), AppError> {
        let email = normalize_email(&settings.admin_email);
        if let Some(existing) = self.user_repo.find_by_email(&email).await? {
            return Ok((existing.id, false));
        }

        let now = Utc::now();
        let admin = User {
            id: Uuid::new_v4(),
            email,
            password_hash: hash_password(&settings.admin_password)?,
            first_name: "Admin".into(),
            last_name: "User".into(),
            role: UserRole::Admin,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let created = self.user_repo.create(&admin).await?;
        Ok((created.id, true))
    }

    async fn ensure_category(&self, seed: &CategorySeed) -> Result<(Uuid, bool), AppError> {
        if let Some(existing) = self.category_repo.find_by_slug(seed.slug).await? {
            return Ok((existing.id, false));
        }

        let mut category = Category::new(seed.name.to_string(), seed.slug.to_string());
        category.description = Some(seed.description.to_string());
        category.sort_order = seed.sort_order;

        let created = self.category_repo.create(&category).await?;
        Ok((created.id, true))
    }

    async fn ensure_tag(&self, seed: &TagSeed) -> Result<(Uuid, bool), AppError> {
        if let Some(existing) = self.tag_repo.find_by_slug(seed.slug).await? {
            return Ok((existing.id, false));
        }

        let mut tag = Tag::new(seed.name.to_string(), seed.slug.to_string());
        tag.description = Some(seed.description.to_string());
        tag.color = seed.color.to_string();

        let created = self.tag_repo.create(&tag).await?;
        Ok((created.id, true))
    }
}
