// Canonical skill → aliases table used by KeywordMatcher.
// Aliases are matched case-insensitively as whole words; keep them lowercase.
// Names that are also plain English words (go, node, react, spark, containers)
// only match through unambiguous forms such as "golang" or "react.js".
// Single-letter names (C, R) are left out entirely.

pub type SkillCatalog = &'static [(&'static str, &'static [&'static str])];

pub const DEFAULT_SKILL_CATALOG: SkillCatalog = &[
    // Languages
    ("Python", &["python"]),
    ("Java", &["java"]),
    ("JavaScript", &["javascript", "js", "ecmascript"]),
    ("TypeScript", &["typescript", "ts"]),
    ("Rust", &["rust"]),
    ("Go", &["golang"]),
    ("C++", &["c++", "cpp"]),
    ("C#", &["c#", "csharp", ".net", "asp.net"]),
    ("SQL", &["sql", "postgresql", "postgres", "mysql", "sqlite"]),
    ("Scala", &["scala"]),
    ("Bash", &["bash", "shell scripting"]),
    // Web
    ("React", &["react.js", "reactjs", "react native"]),
    ("Node.js", &["node.js", "nodejs"]),
    ("FastAPI", &["fastapi"]),
    ("Django", &["django"]),
    ("Flask", &["flask"]),
    ("REST APIs", &["rest api", "rest apis", "restful"]),
    ("GraphQL", &["graphql"]),
    // Data & ML
    ("Machine Learning", &["machine learning", "ml"]),
    ("Deep Learning", &["deep learning", "neural networks", "neural network"]),
    ("NLP", &["nlp", "natural language processing"]),
    ("Computer Vision", &["computer vision", "opencv"]),
    ("PyTorch", &["pytorch", "torch"]),
    ("TensorFlow", &["tensorflow", "keras"]),
    ("scikit-learn", &["scikit-learn", "sklearn", "scikit learn"]),
    ("Pandas", &["pandas"]),
    ("NumPy", &["numpy"]),
    ("Spark", &["pyspark", "apache spark"]),
    ("Transformers", &["transformers", "transformer models", "hugging face", "huggingface"]),
    ("LLMs", &["llm", "llms", "large language model", "large language models"]),
    ("Generative AI", &["generative ai", "genai", "gen ai"]),
    ("Prompt Engineering", &["prompt engineering", "prompt design"]),
    ("RAG", &["rag", "retrieval-augmented generation", "retrieval augmented generation"]),
    ("LangChain", &["langchain"]),
    ("Vector Databases", &["vector database", "vector databases", "faiss", "pinecone", "weaviate", "qdrant", "chroma"]),
    ("Embeddings", &["embeddings", "embedding models", "vector embeddings"]),
    ("Fine-tuning", &["fine-tuning", "fine tuning", "finetuning", "lora"]),
    ("MLOps", &["mlops", "mlflow", "kubeflow"]),
    ("Data Visualization", &["data visualization", "tableau", "power bi", "matplotlib"]),
    ("Statistics", &["statistics", "statistical modeling", "statistical analysis"]),
    // Infrastructure
    ("Docker", &["docker"]),
    ("Kubernetes", &["kubernetes", "k8s"]),
    ("AWS", &["aws", "amazon web services", "sagemaker"]),
    ("Azure", &["azure"]),
    ("GCP", &["gcp", "google cloud", "vertex ai"]),
    ("Terraform", &["terraform"]),
    ("CI/CD", &["ci/cd", "continuous integration", "continuous delivery", "github actions", "jenkins"]),
    ("Git", &["git", "github", "gitlab"]),
    ("Linux", &["linux", "unix"]),
    ("Kafka", &["kafka"]),
    ("Airflow", &["airflow"]),
    ("MongoDB", &["mongodb", "mongo"]),
    ("Redis", &["redis"]),
    // Practices
    ("Microservices", &["microservices", "microservice"]),
    ("Agile", &["agile", "scrum"]),
    ("System Design", &["system design", "distributed systems"]),
    ("Testing", &["unit testing", "pytest", "test automation", "tdd"]),
];
